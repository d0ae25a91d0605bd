/// A single page-size/page-number pass over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: u32,
    pub number: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            size: 1000,
            number: 1,
        }
    }
}

impl Page {
    pub fn new(size: u32, number: u32) -> Self {
        Self { size, number }
    }

    pub(crate) fn query(&self) -> [(&'static str, String); 2] {
        [
            ("pageSize", self.size.to_string()),
            ("pageNumber", self.number.to_string()),
        ]
    }
}
