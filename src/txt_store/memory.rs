use crate::error::Error;
use crate::txt_store::{normalize_host, TxtStore};
use std::collections::HashMap;

#[derive(Default, Debug, Clone)]
pub struct InMemoryTxtStore {
    txt_records: HashMap<String, String>,
}

#[async_trait::async_trait]
impl TxtStore for InMemoryTxtStore {
    async fn add_txt(&mut self, host: &str, value: String) -> Result<String, Error> {
        let key = normalize_host(host).ok_or(Error::InvalidRequest)?;
        self.txt_records.insert(key.clone(), value);
        Ok(key)
    }

    async fn get_txt(&self, host: &str) -> Option<String> {
        self.txt_records.get(host).cloned()
    }
}
