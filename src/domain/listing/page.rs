use serde::{Deserialize, Serialize};

/// One page of a listing together with the size of the full result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let page = PageResult {
            total_count: 42,
            items: vec!["a".to_string(), "b".to_string()],
        };

        let json = serde_json::to_string(&page).unwrap();
        let back: PageResult<String> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, page);
    }

    #[test]
    fn test_empty_page_serialization() {
        let page: PageResult<String> = PageResult::empty();
        assert!(page.is_empty());
        assert_eq!(
            serde_json::to_string(&page).unwrap(),
            r#"{"total_count":0,"items":[]}"#
        );
    }

    #[test]
    fn test_page_past_end_is_empty_despite_total() {
        let page = PageResult {
            total_count: 7,
            items: Vec::<u8>::new(),
        };
        assert!(page.is_empty());
    }
}
