use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    // Absent and empty are treated the same by validation.
    #[serde(default)]
    pub url: String,
}

/// Success payload for one extracted ghazal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub success: bool,
    pub verses: Vec<String>,
    pub text_content: String,
    pub filename: String,
    pub count: usize,
}

impl Extraction {
    pub fn new(verses: Vec<String>, filename: String) -> Self {
        Self {
            success: true,
            text_content: verses.join("\n"),
            count: verses.len(),
            filename,
            verses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_wire_shape() {
        let e = Extraction::new(
            vec!["دل ناداں".to_string(), "تجھے ہوا کیا ہے".to_string()],
            "some-title.txt".to_string(),
        );
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["count"], 2);
        assert_eq!(v["filename"], "some-title.txt");
        assert_eq!(v["textContent"], "دل ناداں\nتجھے ہوا کیا ہے");
        assert_eq!(v["verses"].as_array().unwrap().len(), 2);
    }
}
