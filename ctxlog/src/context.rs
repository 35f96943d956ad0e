//! Контекст запроса: пользователь, идентификатор запроса и имя лога.
//!
//! Контекст только читается логгером. Производные контексты создаются
//! через `with_*`, исходное значение не меняется.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    RequestId,
    User,
    LogName,
}

impl ContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::RequestId => "reqID",
            ContextKey::User => "user",
            ContextKey::LogName => "logName",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    request_id: Option<String>,
    user: Option<String>,
    log_name: Option<String>,
}

impl LogContext {
    /// Пустой контекст: все поля отсутствуют.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_request_id(self, request_id: impl Into<String>) -> Self {
        self.with_value(ContextKey::RequestId, request_id)
    }

    pub fn with_user(self, user: impl Into<String>) -> Self {
        self.with_value(ContextKey::User, user)
    }

    pub fn with_log_name(self, log_name: impl Into<String>) -> Self {
        self.with_value(ContextKey::LogName, log_name)
    }

    pub fn with_value(mut self, key: ContextKey, value: impl Into<String>) -> Self {
        *self.slot(key) = Some(value.into());
        self
    }

    pub fn value(&self, key: ContextKey) -> Option<&str> {
        match key {
            ContextKey::RequestId => self.request_id.as_deref(),
            ContextKey::User => self.user.as_deref(),
            ContextKey::LogName => self.log_name.as_deref(),
        }
    }

    // Отсутствующее поле - пустая строка, не ошибка
    pub(crate) fn field(&self, key: ContextKey) -> &str {
        self.value(key).unwrap_or("")
    }

    fn slot(&mut self, key: ContextKey) -> &mut Option<String> {
        match key {
            ContextKey::RequestId => &mut self.request_id,
            ContextKey::User => &mut self.user,
            ContextKey::LogName => &mut self.log_name,
        }
    }
}
