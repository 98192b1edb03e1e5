//! Text patterns read by the scorer
//!
//! Patterns cover Korean and English phrasing. All but the statistic pattern
//! ignore case.

use regex::Regex;
use std::sync::LazyLock;

/// A number followed by a unit or counter
pub(crate) static STATISTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+[\.,]?\d*\s*(%|명|건|시간|만|억|개|회|년|월|달|배|위|조원|백만|천)")
        .expect("Failed to compile statistic pattern - this is a bug")
});

/// Source or citation wording
pub(crate) static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)출처|근거|연구|조사|보고서|survey|report|according|연구결과|통계|데이터에\s*따르면")
        .expect("Failed to compile citation pattern - this is a bug")
});

/// FAQ or Q&A wording
pub(crate) static FAQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FAQ|자주\s*묻는\s*질문|Q\s*[.:]|Q\d|질문과\s*답변")
        .expect("Failed to compile FAQ pattern - this is a bug")
});

/// Publication or update dates
pub(crate) static DATE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)202[0-9]|발행일|작성일|업데이트|updated|published|발행\s+\d{4}")
        .expect("Failed to compile date pattern - this is a bug")
});

/// Author or editor attribution
pub(crate) static AUTHOR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)작성자|저자|편집|감수|editor|author|기자|집필")
        .expect("Failed to compile author pattern - this is a bug")
});
