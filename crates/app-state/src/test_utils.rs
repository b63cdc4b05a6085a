//! Test utilities shared by the store tests

use async_trait::async_trait;
use mockall::mock;
use storage::medium::{KeyValueMedium, Result};

mock! {
    /// Medium whose every call is scripted by the test
    pub Medium {}

    #[async_trait]
    impl KeyValueMedium for Medium {
        async fn get_item(&self, key: &str) -> Result<Option<String>>;
        async fn set_item(&self, key: &str, value: String) -> Result<()>;
        async fn remove_item(&self, key: &str) -> Result<bool>;
    }
}
