//! 信息量度量：香农熵与二元组互信息近似

use std::collections::HashMap;

/// 香农熵（bit）：对文本的逐字符频率分布计算 -Σ p(c) log2 p(c)
///
/// 空文本返回 0.0。
pub fn shannon_entropy(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut char_counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for ch in text.chars() {
        *char_counts.entry(ch).or_insert(0) += 1;
        total += 1;
    }

    let total = total as f64;
    char_counts.values().fold(0.0, |entropy, &count| {
        let probability = count as f64 / total;
        entropy - probability * probability.log2()
    })
}

/// 两段文本的互信息**近似值**（非严格互信息，刻意保留的简化公式）
///
/// 对两段文本各自建立字符二元组频率分布；对并集中的每个二元组，
/// 以两个边缘概率的算术平均近似联合概率，并仅在两边概率都非零时累加
/// `joint * log2(joint / (p_a * p_b))`，最后截断为非负。
/// 下游依赖该公式的具体输出形态，不要替换成教科书式互信息。
pub fn approx_mutual_information(a: &str, b: &str) -> f64 {
    let dist_a = bigram_distribution(a);
    let dist_b = bigram_distribution(b);
    if dist_a.is_empty() || dist_b.is_empty() {
        return 0.0;
    }

    let mut mi = 0.0;
    let mut bigrams: Vec<&(char, char)> = dist_a.keys().chain(dist_b.keys()).collect();
    bigrams.sort();
    bigrams.dedup();

    for bigram in bigrams {
        let p_a = dist_a.get(bigram).copied().unwrap_or(0.0);
        let p_b = dist_b.get(bigram).copied().unwrap_or(0.0);
        let joint = (p_a + p_b) / 2.0;
        if joint > 0.0 && p_a > 0.0 && p_b > 0.0 {
            mi += joint * (joint / (p_a * p_b)).log2();
        }
    }

    mi.max(0.0)
}

/// 字符二元组概率分布；不足两个字符时为空
fn bigram_distribution(text: &str) -> HashMap<(char, char), f64> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 2 {
        return HashMap::new();
    }

    let mut counts: HashMap<(char, char), usize> = HashMap::new();
    for window in chars.windows(2) {
        *counts.entry((window[0], window[1])).or_insert(0) += 1;
    }

    let total = (chars.len() - 1) as f64;
    counts
        .into_iter()
        .map(|(bigram, count)| (bigram, count as f64 / total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_uniform_text_is_zero() {
        assert_eq!(shannon_entropy("aaaa"), 0.0);
    }

    #[test]
    fn test_entropy_of_empty_text_is_zero() {
        assert_eq!(shannon_entropy(""), 0.0);
    }

    #[test]
    fn test_entropy_of_equal_frequencies_is_log2_n() {
        // 4 个等频字符 -> log2(4) = 2 bit
        assert!((shannon_entropy("abcd") - 2.0).abs() < 1e-12);
        // 8 个等频字符 -> 3 bit
        assert!((shannon_entropy("abcdefgh") - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_counts_unicode_chars() {
        // 两个等频汉字 -> 1 bit
        assert!((shannon_entropy("采集") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mutual_information_identical_texts_is_positive() {
        let mi = approx_mutual_information("abcabc", "abcabc");
        assert!(mi > 0.0);
    }

    #[test]
    fn test_mutual_information_disjoint_bigrams_is_zero() {
        assert_eq!(approx_mutual_information("aaaa", "bbbb"), 0.0);
    }

    #[test]
    fn test_mutual_information_empty_input_is_zero() {
        assert_eq!(approx_mutual_information("", "abc"), 0.0);
        assert_eq!(approx_mutual_information("abc", ""), 0.0);
        assert_eq!(approx_mutual_information("a", "b"), 0.0);
    }

    #[test]
    fn test_mutual_information_never_negative() {
        let mi = approx_mutual_information("abcdefgh", "hgfedcba");
        assert!(mi >= 0.0);
    }
}
