/// Reads a gene front to back, one level at a time
pub struct GeneConsumer<'a> {
    gene: &'a [char],
    position: usize,
}

impl<'a> GeneConsumer<'a> {
    pub fn new(gene: &'a [char]) -> Self {
        Self { gene, position: 0 }
    }

    /// Take up to `count` symbols; fewer when the gene runs out
    pub fn consume(&mut self, count: usize) -> std::ops::Range<usize> {
        let start = self.position;
        let end = (start + count).min(self.gene.len());
        self.position = end;
        start..end
    }

    pub fn symbols(&self, range: std::ops::Range<usize>) -> &'a [char] {
        &self.gene[range]
    }

    /// Check if symbols remaining
    pub fn has_symbols(&self) -> bool {
        self.position < self.gene.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }
}
