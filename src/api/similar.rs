/// Pages through an artist's similar-artist list.
///
/// Offsets advance by the page size and wrap after `max` results, so repeated
/// requests cycle through the same window of the similarity ranking.
#[derive(Debug, Clone)]
pub struct SimilarArtistCursor {
    page_size: usize,
    max: usize,
    offset: usize,
}

impl SimilarArtistCursor {
    pub fn new(page_size: usize, max: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            max: max.max(1),
            offset: 0,
        }
    }

    /// Return `(count, offset)` for the next request and advance.
    pub fn next_page(&mut self) -> (usize, usize) {
        let offset = self.offset;
        let count = self.page_size.min(self.max - offset);
        self.offset = (offset + count) % self.max;
        (count, offset)
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}
