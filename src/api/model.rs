use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub(super) struct SetTxtRequest {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Serialize, Debug)]
pub(super) struct SetTxtResult {
    pub host: String,
    pub value: String,
}
