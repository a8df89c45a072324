//! 相依清單 (requirements 格式) 的解析與驗證。
//!
//! 每一行是一個套件規格 `name[extras]>=version  # comment`，以 `#` 開頭的註解
//! 若位於空行之後並緊接套件行，會被視為段落標題 (core、LLM integration、testing…)。

pub mod parser;
pub mod requirement;
pub mod validate;
pub mod version;

pub use parser::{LineKind, Manifest, ManifestLine};
pub use requirement::{normalize_name, Comparator, Constraint, Requirement};
pub use validate::{validate, Issue, IssueSeverity, ValidationReport};
pub use version::Version;
