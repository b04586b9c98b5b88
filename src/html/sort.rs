//! 文件名自然排序
//!
//! 把文件名拆成交替的文本段和数字段，数字段按数值比较，
//! 使 `1.2` 排在 `1.10` 之前。

use std::cmp::Ordering;
use std::path::Path;

/// 排序键中的一段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPart {
    /// 小写化后的非数字文本
    Text(String),
    /// 去掉前导零的数字串，任意长度都能正确比较
    Number(String),
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyPart::Number(a), KeyPart::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (KeyPart::Text(a), KeyPart::Text(b)) => a.cmp(b),
            (KeyPart::Number(_), KeyPart::Text(_)) => Ordering::Less,
            (KeyPart::Text(_), KeyPart::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 自然排序键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(pub Vec<KeyPart>);

/// 生成文件名的自然排序键（只使用路径中的文件名部分）
///
/// 键总是以文本段开头（可能为空），之后文本段与数字段交替出现，
/// 因此两个键在同一位置上的段类型总是一致的。
pub fn natural_sort_key(filename: &str) -> NaturalKey {
    let basename = Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    let mut parts = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in basename.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if !digits.is_empty() {
            parts.push(KeyPart::Text(std::mem::take(&mut text).to_lowercase()));
            parts.push(number_part(&std::mem::take(&mut digits)));
        }
        text.push(c);
    }

    parts.push(KeyPart::Text(text.to_lowercase()));
    if !digits.is_empty() {
        parts.push(number_part(&digits));
        parts.push(KeyPart::Text(String::new()));
    }

    NaturalKey(parts)
}

fn number_part(digits: &str) -> KeyPart {
    let trimmed = digits.trim_start_matches('0');
    KeyPart::Number(trimmed.to_string())
}

/// 按自然顺序原地排序路径；键相同时保持原有顺序
pub fn natural_sort<P: AsRef<Path>>(paths: &mut [P]) {
    paths.sort_by_cached_key(|path| natural_sort_key(&path.as_ref().to_string_lossy()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_version_numbers_sort_numerically() {
        let mut names = vec!["1.10", "1.2", "1.1"];
        names.sort_by_key(|name| natural_sort_key(name));
        assert_eq!(names, vec!["1.1", "1.2", "1.10"]);
    }

    #[test]
    fn test_nested_sections() {
        let mut names = vec![
            "1.10-summary.html",
            "1.1.1-history.html",
            "1.2-cells.html",
            "1.1-intro.html",
        ];
        names.sort_by_key(|name| natural_sort_key(name));
        assert_eq!(
            names,
            vec![
                "1.1-intro.html",
                "1.1.1-history.html",
                "1.2-cells.html",
                "1.10-summary.html",
            ]
        );
    }

    #[test]
    fn test_key_shape_alternates() {
        let key = natural_sort_key("Ch02a");
        assert_eq!(
            key.0,
            vec![
                KeyPart::Text("ch".to_string()),
                KeyPart::Number("2".to_string()),
                KeyPart::Text("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_names_without_digits_compare_lexically_and_case_insensitively() {
        let mut names = vec!["Preface.html", "appendix.html", "glossary.html"];
        names.sort_by_key(|name| natural_sort_key(name));
        assert_eq!(names, vec!["appendix.html", "glossary.html", "Preface.html"]);
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        let small = natural_sort_key("part99999999999999999999999.html");
        let large = natural_sort_key("part100000000000000000000000.html");
        assert!(small < large);
    }

    #[test]
    fn test_only_basename_is_used() {
        assert_eq!(natural_sort_key("/z/dir/1.2.html"), natural_sort_key("/a/1.2.html"));

        let mut paths = vec![PathBuf::from("book/1.10.html"), PathBuf::from("book/1.9.html")];
        natural_sort(&mut paths);
        assert_eq!(paths[0], PathBuf::from("book/1.9.html"));
    }
}
