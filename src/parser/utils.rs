use std::fmt;

/// Zero-based location of a character in a source document.
///
/// `index` counts characters from the start of the source, while `line` and
/// `column` are what gets reported back to users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
pub struct SourcePosition {
    index: usize,
    line: usize,
    col: usize,
}

impl SourcePosition {
    #[doc(hidden)]
    pub fn new(index: usize, line: usize, col: usize) -> Self {
        assert!(index >= line + col);

        Self { index, line, col }
    }

    #[doc(hidden)]
    pub fn new_origin() -> Self {
        Self {
            index: 0,
            line: 0,
            col: 0,
        }
    }

    pub(crate) fn advance_col(&mut self) {
        self.index += 1;
        self.col += 1;
    }

    pub(crate) fn advance_line(&mut self) {
        self.index += 1;
        self.line += 1;
        self.col = 0;
    }

    /// Character offset from the start of the source.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Line of the character, the first line being `0`.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the character, the first column being `0`.
    pub fn column(&self) -> usize {
        self.col
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Half-open range of source positions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// First position covered by this [`Span`].
    pub start: SourcePosition,

    /// First position __after__ this [`Span`].
    pub end: SourcePosition,
}

impl Span {
    #[doc(hidden)]
    pub fn zero_width(pos: SourcePosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[doc(hidden)]
    pub fn single_width(pos: SourcePosition) -> Self {
        let mut end = pos;
        end.advance_col();

        Self { start: pos, end }
    }

    #[doc(hidden)]
    pub fn unlocated() -> Self {
        Self::zero_width(SourcePosition::new_origin())
    }

    /// Returns the smallest [`Span`] covering both `self` and `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Item of a syntax tree together with the [`Span`] it was parsed from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Spanning<T> {
    /// Wrapped item.
    pub item: T,

    /// Source range of the wrapped item.
    pub span: Span,
}

impl<T> Spanning<T> {
    #[doc(hidden)]
    pub fn new(span: Span, item: T) -> Self {
        Self { item, span }
    }

    #[doc(hidden)]
    pub fn zero_width(&pos: &SourcePosition, item: T) -> Self {
        Self::new(Span::zero_width(pos), item)
    }

    #[doc(hidden)]
    pub fn single_width(&pos: &SourcePosition, item: T) -> Self {
        Self::new(Span::single_width(pos), item)
    }

    #[doc(hidden)]
    pub fn start_end(&start: &SourcePosition, &end: &SourcePosition, item: T) -> Self {
        Self::new(Span { start, end }, item)
    }

    /// Wraps a non-empty sequence of spanned items into a single [`Spanning`]
    /// covering all of them.
    #[expect(clippy::self_named_constructors, reason = "spans a sequence")]
    pub fn spanning(v: Vec<Spanning<T>>) -> Option<Spanning<Vec<Spanning<T>>>> {
        let span = v.first()?.span.to(v.last()?.span);
        Some(Spanning::new(span, v))
    }

    #[doc(hidden)]
    pub fn unlocated(item: T) -> Self {
        Self::new(Span::unlocated(), item)
    }

    /// Start position of the item.
    #[inline]
    pub fn start(&self) -> SourcePosition {
        self.span.start
    }

    /// First position after the item.
    #[inline]
    pub fn end(&self) -> SourcePosition {
        self.span.end
    }

    /// Transforms the wrapped item, keeping its [`Span`].
    pub fn map<O, F: FnOnce(T) -> O>(self, f: F) -> Spanning<O> {
        Spanning::new(self.span, f(self.item))
    }

    /// Like [`Spanning::map`], but for fallible transformations.
    pub fn and_then<O, F: FnOnce(T) -> Option<O>>(self, f: F) -> Option<Spanning<O>> {
        f(self.item).map(|item| Spanning::new(self.span, item))
    }

    /// Borrows the wrapped item, keeping its [`Span`].
    pub fn as_ref(&self) -> Spanning<&T> {
        Spanning::new(self.span, &self.item)
    }
}

impl<T: fmt::Display> fmt::Display for Spanning<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}. At {}", self.item, self.span.start)
    }
}

impl<T: std::error::Error> std::error::Error for Spanning<T> {}
