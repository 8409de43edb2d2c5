use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortLinkError {
    OriginalUrlRequired(String),
    ShortUrlRequired(String),
    DuplicateShortUrl(String),
    ReservedShortUrl(String),
    NotFound(String),
    StoreFailure(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    Config(String),
}

impl ShortLinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortLinkError::OriginalUrlRequired(_) => "E001",
            ShortLinkError::ShortUrlRequired(_) => "E002",
            ShortLinkError::DuplicateShortUrl(_) => "E003",
            ShortLinkError::ReservedShortUrl(_) => "E004",
            ShortLinkError::NotFound(_) => "E005",
            ShortLinkError::StoreFailure(_) => "E006",
            ShortLinkError::DatabaseConfig(_) => "E007",
            ShortLinkError::DatabaseConnection(_) => "E008",
            ShortLinkError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortLinkError::OriginalUrlRequired(_) => "Original URL Required",
            ShortLinkError::ShortUrlRequired(_) => "Short URL Required",
            ShortLinkError::DuplicateShortUrl(_) => "Duplicate Short URL",
            ShortLinkError::ReservedShortUrl(_) => "Reserved Short URL",
            ShortLinkError::NotFound(_) => "Resource Not Found",
            ShortLinkError::StoreFailure(_) => "Store Failure",
            ShortLinkError::DatabaseConfig(_) => "Database Configuration Error",
            ShortLinkError::DatabaseConnection(_) => "Database Connection Error",
            ShortLinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortLinkError::OriginalUrlRequired(msg) => msg,
            ShortLinkError::ShortUrlRequired(msg) => msg,
            ShortLinkError::DuplicateShortUrl(msg) => msg,
            ShortLinkError::ReservedShortUrl(msg) => msg,
            ShortLinkError::NotFound(msg) => msg,
            ShortLinkError::StoreFailure(msg) => msg,
            ShortLinkError::DatabaseConfig(msg) => msg,
            ShortLinkError::DatabaseConnection(msg) => msg,
            ShortLinkError::Config(msg) => msg,
        }
    }

    /// Whether the caller can recover by changing its input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShortLinkError::OriginalUrlRequired(_)
                | ShortLinkError::ShortUrlRequired(_)
                | ShortLinkError::DuplicateShortUrl(_)
                | ShortLinkError::ReservedShortUrl(_)
        )
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortLinkError {}

// 便捷的构造函数
impl ShortLinkError {
    pub fn original_url_required<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::OriginalUrlRequired(msg.into())
    }

    pub fn short_url_required<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::ShortUrlRequired(msg.into())
    }

    pub fn duplicate_short_url<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::DuplicateShortUrl(msg.into())
    }

    pub fn reserved_short_url<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::ReservedShortUrl(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::NotFound(msg.into())
    }

    pub fn store_failure<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::StoreFailure(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::DatabaseConnection(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortLinkError::Config(msg.into())
    }
}

// A unique-index violation on short_url is the storage-level form of a
// duplicate; everything else is an opaque store failure.
impl From<sea_orm::DbErr> for ShortLinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                ShortLinkError::DuplicateShortUrl(format!("Short URL already in use: {}", detail))
            }
            _ => ShortLinkError::StoreFailure(err.to_string()),
        }
    }
}

impl From<std::io::Error> for ShortLinkError {
    fn from(err: std::io::Error) -> Self {
        ShortLinkError::StoreFailure(err.to_string())
    }
}

impl From<config::ConfigError> for ShortLinkError {
    fn from(err: config::ConfigError) -> Self {
        ShortLinkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortLinkError>;
