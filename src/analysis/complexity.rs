//! 综合复杂度评分

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::entropy::shannon_entropy;

/// 单个内容样本的复杂度指标，每次调用重新计算
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    /// 香农熵（bit，>= 0）
    pub entropy: f64,
    /// 去重字符数 / 总字符数（真实压缩率的粗略替身，(0, 1]）
    pub compression_ratio: f64,
    /// 去重小写词数 / 总词数（[0, 1]）
    pub lexical_diversity: f64,
    /// entropy * lexical_diversity / compression_ratio；压缩率为 0 时取 0
    pub composite: f64,
}

/// 计算文本的复杂度指标；空文本返回全零，不报错
pub fn complexity_score(text: &str) -> ComplexityMetrics {
    if text.is_empty() {
        return ComplexityMetrics::default();
    }

    let entropy = shannon_entropy(text);

    let mut distinct_chars: HashSet<char> = HashSet::new();
    let mut total_chars = 0usize;
    for ch in text.chars() {
        distinct_chars.insert(ch);
        total_chars += 1;
    }
    let compression_ratio = distinct_chars.len() as f64 / total_chars as f64;

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let lexical_diversity = if words.is_empty() {
        0.0
    } else {
        let distinct_words: HashSet<&str> = words.iter().copied().collect();
        distinct_words.len() as f64 / words.len() as f64
    };

    let composite = if compression_ratio > 0.0 {
        entropy * lexical_diversity / compression_ratio
    } else {
        0.0
    };

    ComplexityMetrics {
        entropy,
        compression_ratio,
        lexical_diversity,
        composite,
    }
}
