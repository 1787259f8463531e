use crate::domain::MovieRecord;

/// Everything the renderer needs for one run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub records: Vec<MovieRecord>,
    pub total_count: u64,
    pub inaccessible_urls: Vec<String>,
    pub violation_titles: Vec<String>,
}

impl Report {
    pub fn inaccessible_count(&self) -> usize {
        self.inaccessible_urls.len()
    }

    pub fn violation_count(&self) -> usize {
        self.violation_titles.len()
    }

    pub fn new_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_new).count()
    }
}
