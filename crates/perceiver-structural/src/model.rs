use serde::{Deserialize, Serialize};

/// Bounded structural digest of one page.
///
/// Rebuilt on every extraction and never cached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    /// Visible body text, truncated
    pub text: String,
    /// Serialized document with password values scrubbed, truncated
    pub markup: String,
    pub forms: Vec<FormDigest>,
    pub links: Vec<LinkDigest>,
    pub images: Vec<ImageDigest>,
    pub buttons: Vec<ButtonDigest>,
    pub meta: PageMeta,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDigest {
    pub id: Option<String>,
    /// Absolute submission target; the page URL when the form declares none
    pub action: Option<String>,
    pub method: String,
    pub inputs: Vec<FieldDigest>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDigest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    pub id: Option<String>,
    pub placeholder: Option<String>,
    /// Live value; always the redaction marker for password fields
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDigest {
    pub text: String,
    pub href: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDigest {
    pub src: String,
    pub alt: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonDigest {
    pub text: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub button_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub viewport: Option<String>,
}
