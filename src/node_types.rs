use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    String,
    Object,
    Custom(String),
}

impl Default for DataType {
    fn default() -> Self {
        DataType::String
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Category {
    // Applications
    PythonApp,
    BashShellApp,
    DockerApp,
    // Data
    File,
    Memory,
    // Constructs
    Scatter,
    Gather,
    Loop,
    SubGraph,
    // Other
    Comment,
    Description,
    Unknown,
}

impl Category {
    /// Constructs may own child nodes.
    pub fn is_construct(&self) -> bool {
        matches!(
            self,
            Category::Scatter | Category::Gather | Category::Loop | Category::SubGraph
        )
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Unknown
    }
}
