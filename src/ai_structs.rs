use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct FilenameSuggestions {
    #[schemars(
        description = "Exactly 3 file name suggestions without extension, best first, each following the requested naming convention"
    )]
    #[schemars(length(min = 3, max = 3))]
    pub suggestions: Vec<String>,
}
