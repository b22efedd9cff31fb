//! Capability tags.
//!
//! Every cursor declares one of these tags as its [`IteratorTraits::Category`](super::IteratorTraits::Category).
//! Generic code bounds on the category traits (or implements a dispatch trait per tag) to pick the cheapest algorithm the cursor supports.
//!
//! ```text
//! RandomAccessTag -> BidirectionalTag -> ForwardTag -> InputTag        OutputTag
//! ```

mod private {
    pub trait Sealed {}
}

/// Marker for single-pass cursors that can be read and stepped forward.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct InputTag;

/// Marker for cursors that can only be written through.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct OutputTag;

/// Marker for multi-pass cursors.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ForwardTag;

/// Marker for cursors that can also step backwards.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct BidirectionalTag;

/// Marker for cursors that can jump by any offset in constant time.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct RandomAccessTag;

/// Any capability tag.
pub trait Category: private::Sealed + Copy + Default + 'static {
    /// Name of the category
    const NAME: &'static str;
}

/// Tags whose cursors can be read.
pub trait InputCategory: Category {}
/// Tags whose cursors can be copied and traversed more than once.
pub trait ForwardCategory: InputCategory {}
/// Tags whose cursors can step back.
pub trait BidirectionalCategory: ForwardCategory {}
/// Tags whose cursors support constant time offsets.
pub trait RandomAccessCategory: BidirectionalCategory {}

macro_rules! impl_category {
    ($tag:ty, $name:literal $(, $cap:ident)*) => {
        impl private::Sealed for $tag {}
        impl Category for $tag {
            const NAME: &'static str = $name;
        }
        $(impl $cap for $tag {})*
    };
}

impl_category!(InputTag,         "input",          InputCategory);
impl_category!(OutputTag,        "output");
impl_category!(ForwardTag,       "forward",        InputCategory, ForwardCategory);
impl_category!(BidirectionalTag, "bidirectional",  InputCategory, ForwardCategory, BidirectionalCategory);
impl_category!(RandomAccessTag,  "random access",  InputCategory, ForwardCategory, BidirectionalCategory, RandomAccessCategory);

// Widening along the lattice, a cursor of a stronger category can always be treated as a weaker one.

impl From<ForwardTag> for InputTag {
    fn from(_: ForwardTag) -> Self { InputTag }
}

impl From<BidirectionalTag> for ForwardTag {
    fn from(_: BidirectionalTag) -> Self { ForwardTag }
}

impl From<BidirectionalTag> for InputTag {
    fn from(_: BidirectionalTag) -> Self { InputTag }
}

impl From<RandomAccessTag> for BidirectionalTag {
    fn from(_: RandomAccessTag) -> Self { BidirectionalTag }
}

impl From<RandomAccessTag> for ForwardTag {
    fn from(_: RandomAccessTag) -> Self { ForwardTag }
}

impl From<RandomAccessTag> for InputTag {
    fn from(_: RandomAccessTag) -> Self { InputTag }
}
