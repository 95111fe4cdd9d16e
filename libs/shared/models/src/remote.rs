use crate::error::ApiError;

/// Explicit result of an async operation, consumed uniformly by rendering
/// code instead of per-form loading/error booleans.
#[derive(Debug, Default)]
pub enum RemoteData<T> {
    #[default]
    Idle,
    Pending,
    Succeeded(T),
    Failed(ApiError),
}

impl<T> RemoteData<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RemoteData::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RemoteData::Pending)
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            RemoteData::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failed(&self) -> Option<&ApiError> {
        match self {
            RemoteData::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => RemoteData::Succeeded(value),
            Err(err) => RemoteData::Failed(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteData<U> {
        match self {
            RemoteData::Idle => RemoteData::Idle,
            RemoteData::Pending => RemoteData::Pending,
            RemoteData::Succeeded(value) => RemoteData::Succeeded(f(value)),
            RemoteData::Failed(err) => RemoteData::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let data: RemoteData<Vec<u32>> = RemoteData::default();
        assert!(data.is_idle());
    }

    #[test]
    fn from_result_maps_both_arms() {
        let ok: RemoteData<u32> = RemoteData::from_result(Ok(7));
        assert_eq!(ok.succeeded(), Some(&7));

        let err: RemoteData<u32> =
            RemoteData::from_result(Err(ApiError::Domain("ocupado".to_string())));
        assert!(err.failed().is_some());
    }
}
