//! 业务逻辑服务模块
//! 
//! 封装数据获取、计算和展示格式化逻辑

pub mod yahoo;             // 行情数据源客户端
pub mod format;            // 数值与文本格式化
pub mod trend;             // 区间涨跌幅
pub mod dashboard_service; // 看板组装
