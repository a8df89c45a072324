use super::requirement::Requirement;
use crate::utils::error::{PlaygroundError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LineKind {
    Blank,
    Comment(String),
    SectionHeader(String),
    Requirement(Requirement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestLine {
    /// 從 1 開始的行號
    pub line_no: usize,
    pub kind: LineKind,
}

/// 解析後的相依清單，保留原檔每一行的順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestLine>,
}

impl Manifest {
    /// 從檔案載入清單
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlaygroundError::IoError)?;
        tracing::debug!("Read manifest {} ({} bytes)", path.as_ref().display(), content.len());
        Self::parse(&content)
    }

    /// 解析清單內容，遇到第一個無法解析的套件行即失敗
    pub fn parse(content: &str) -> Result<Self> {
        let lines: Vec<&str> = content.lines().collect();
        let mut entries = Vec::with_capacity(lines.len());
        let mut current_section: Option<String> = None;

        for (index, raw) in lines.iter().enumerate() {
            let line_no = index + 1;
            let trimmed = raw.trim();

            let kind = if trimmed.is_empty() {
                LineKind::Blank
            } else if let Some(text) = trimmed.strip_prefix('#') {
                if is_section_header(&lines, index) {
                    let title = header_title(text);
                    current_section = Some(title.clone());
                    LineKind::SectionHeader(title)
                } else {
                    LineKind::Comment(text.trim().to_string())
                }
            } else {
                let mut requirement: Requirement =
                    trimmed
                        .parse()
                        .map_err(|reason| PlaygroundError::ManifestParseError {
                            line: line_no,
                            content: trimmed.to_string(),
                            reason,
                        })?;
                requirement.section = current_section.clone();
                LineKind::Requirement(requirement)
            };

            entries.push(ManifestLine { line_no, kind });
        }

        tracing::debug!("Parsed manifest with {} lines", entries.len());
        Ok(Self { entries })
    }

    pub fn requirements(&self) -> impl Iterator<Item = (usize, &Requirement)> {
        self.entries.iter().filter_map(|entry| match &entry.kind {
            LineKind::Requirement(req) => Some((entry.line_no, req)),
            _ => None,
        })
    }

    pub fn sections(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.kind {
                LineKind::SectionHeader(title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 某個段落底下的套件
    pub fn requirements_in(&self, section: &str) -> Vec<&Requirement> {
        self.requirements()
            .map(|(_, req)| req)
            .filter(|req| req.section.as_deref() == Some(section))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.requirements().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// 段落標題：位於檔首或空行之後，且下一行就是套件規格的註解
fn is_section_header(lines: &[&str], index: usize) -> bool {
    let after_break = index == 0 || lines[index - 1].trim().is_empty();
    let before_requirement = lines
        .get(index + 1)
        .map(|next| {
            let next = next.trim();
            !next.is_empty() && !next.starts_with('#')
        })
        .unwrap_or(false);
    after_break && before_requirement
}

fn header_title(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| c == '-' || c == '=' || c == '#' || c.is_whitespace())
        .to_string()
}
