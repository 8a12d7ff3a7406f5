/// One fixed-stride group of catalog lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triplet<'a> {
    /// 1-based line number of the name line.
    pub line: usize,
    pub name: &'a str,
    pub line1: &'a str,
    pub line2: &'a str,
}

impl Triplet<'_> {
    pub fn looks_like_tle(&self) -> bool {
        self.line1.starts_with("1 ") && self.line2.starts_with("2 ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<'a> {
    pub triplets: Vec<Triplet<'a>>,
    /// Lines after the last complete triplet.
    pub trailing_lines: usize,
}

/// Split three-line element text into groups of three starting at the first
/// line. Groups are not realigned: a stray line shifts every later group.
pub fn split_triplets(text: &str) -> Split<'_> {
    let lines: Vec<&str> = text.trim_end().lines().map(str::trim).collect();
    let chunks = lines.chunks_exact(3);
    let trailing_lines = chunks.remainder().len();
    let triplets = chunks
        .enumerate()
        .map(|(i, chunk)| Triplet {
            line: i * 3 + 1,
            name: chunk[0],
            line1: chunk[1],
            line2: chunk[2],
        })
        .collect();

    Split {
        triplets,
        trailing_lines,
    }
}
