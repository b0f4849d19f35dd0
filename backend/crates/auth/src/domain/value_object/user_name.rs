//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための**公開識別子（ハンドル）**。
//! ログインと画面表示に使用される。
//!
//! ## 設計方針
//! - NFKC正規化 → 前後の空白除去 → ルールセットで検証 の順で処理
//! - 入力の大文字小文字は保持し、一意性は小文字（canonical）で判定
//! - 許可文字・長さの制約は設定から構築した [`RuleSet`] が決める

use kernel::validation::{RuleSet, ValidationError};
use serde::Serialize;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Validated user name
///
/// # Storage
/// - `original`: trimmed, NFKC normalized input (preserves case)
/// - `canonical`: lowercase form for uniqueness checks
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Normalize `input` and validate it against `rules`
    pub fn parse(input: impl AsRef<str>, rules: &RuleSet) -> Result<Self, ValidationError> {
        let original = Self::normalize(input.as_ref());
        rules.validate(&original)?;
        let canonical = original.to_lowercase();
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Get the original user name (preserves case)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Get the canonical (lowercase) user name
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(original: &str) -> Self {
        Self {
            original: original.to_string(),
            canonical: original.to_lowercase(),
        }
    }

    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserName")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.original
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}

// ============================================================================
// Tests
// ============================================================================
