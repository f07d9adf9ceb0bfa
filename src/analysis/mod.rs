//! 内容复杂度分析
//!
//! 无共享状态的纯函数：香农熵、字符二元组互信息近似、综合复杂度评分。
//! 每次调用都重新计算，不缓存。

mod complexity;
mod entropy;

pub use complexity::{complexity_score, ComplexityMetrics};
pub use entropy::{approx_mutual_information, shannon_entropy};
