// src/domain/role_model.rs
use serde::{Deserialize, Serialize};

/// ロール名を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Manager,
    Employee,
}

impl RoleName {
    /// ロール名を文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Manager => "manager",
            RoleName::Employee => "employee",
        }
    }

    /// 文字列からロール名を解析
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(RoleName::Admin),
            "manager" => Some(RoleName::Manager),
            "employee" => Some(RoleName::Employee),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, RoleName::Admin)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, RoleName::Manager)
    }

    pub fn is_employee(&self) -> bool {
        matches!(self, RoleName::Employee)
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid role name: {}", s))
    }
}
