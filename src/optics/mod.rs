//! Composable optics with merged capabilities.
//!
//! An [`Optic`] is a single accessor that can get, set, modify and lazily
//! traverse the focuses it addresses inside a source. Every optic carries
//! four capability tags:
//!
//! | Axis | Values |
//! |---|---|
//! | [`Cardinality`] | `One`, `Many` |
//! | [`Mutability`] | `ReadOnly`, `ReadWrite` |
//! | [`Direction`] | `UniDir`, `BiDir` |
//! | [`Failure`] | `Pure`, `Fallible` |
//!
//! Composing two optics merges their tags axis by axis, whatever the
//! composition strategy:
//!
//! ```text
//! Many      iff either operand is Many
//! ReadWrite iff both operands are ReadWrite
//! BiDir     iff both operands are BiDir
//! Fallible  iff either operand is Fallible
//! ```
//!
//! # Named Capability Sets
//!
//! | Preset | Cardinality | Mutability | Direction | Constructors |
//! |---|---|---|---|---|
//! | [`Capabilities::ISO`] | One | `ReadWrite` | `BiDir` | [`iso`], [`add`], [`identity`] |
//! | [`Capabilities::LENS`] | One | `ReadWrite` | `UniDir` | [`lens`], [`tuple_first`] |
//! | [`Capabilities::PRISM`] | Many | `ReadWrite` | `BiDir` | [`prism`] |
//! | [`Capabilities::TRAVERSAL`] | Many | `ReadWrite` | `UniDir` | [`traversal`], [`traverse_vec`] |
//! | [`Capabilities::GETTER`] | One | `ReadOnly` | `UniDir` | [`getter`], [`eq`] |
//! | [`Capabilities::FOLD`] | Many | `ReadOnly` | `UniDir` | [`fold`], [`iterating`] |
//!
//! # Example
//!
//! ```
//! use opticore::lens;
//! use opticore::optics::{Context, compose, parse_int, slice_of, traverse_vec};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Form { fields: Vec<String> }
//!
//! let context = Context::background();
//! let numbers = slice_of(
//!     compose(lens!(Form, fields).compose(traverse_vec()), parse_int(10, 0)),
//!     4,
//! );
//!
//! let form = Form { fields: vec!["1".to_string(), "2".to_string()] };
//! assert_eq!(numbers.get(&context, &form).unwrap(), vec![1, 2]);
//!
//! let broken = Form { fields: vec!["1".to_string(), "two".to_string()] };
//! let error = numbers.get(&context, &broken).unwrap_err();
//! assert_eq!(
//!     error.to_string(),
//!     "parsing \"two\": invalid syntax\n\
//!      optic error path:\n\
//!      \tParseInt(10,0)\n\
//!      \tTraverse\n\
//!      \tField(Form.fields)\n\
//!      \tSliceOf(Field(Form.fields) | Traverse | ParseInt(10,0),4)\n",
//! );
//! ```

mod capability;
mod collection;
mod compose;
mod context;
mod each;
mod error;
mod expression;
mod filtered;
mod fold;
mod iso;
mod ixed;
mod ixmap;
mod lens;
mod optic;
mod predicate;
mod prism;
mod reconstrain;
mod sequence;
mod slicing;
mod standard_optics;
mod traversal;
mod view;

pub use capability::{Axis, Capabilities, Cardinality, Direction, Failure, Mutability, merge};
pub use collection::{Col, col_of, slice_of, with_index};
pub use compose::{compose, compose_both, compose_left, compose_with, reindexed, reindexed_with_unmap};
pub use context::{Canceller, Context};
pub use each::{Each, each, traverse_btree_map, traverse_hash_map, traverse_option, traverse_vec};
pub use error::{Cancellation, CapabilityError, ErrorCause, OpticError};
pub use expression::Expression;
pub use filtered::filtered;
pub use fold::{fold, getter};
pub use iso::{fallible_iso, iso};
pub use ixed::Ixed;
pub use ixmap::{
    IxMapBoth, IxMapFn, IxMapFnUnmap, IxMapLeft, IxMapRight, IxMapper, IxPair, ix_map,
    ix_map_with_unmap,
};
pub use lens::lens;
pub use optic::{Modifier, Optic, SimpleOptic};
pub use predicate::{Predicate, eq, gt, lt, ne, not, predicate};
pub use prism::prism;
pub use reconstrain::{
    assume_one, assume_pure, fallible, many, read_only, reconstrain, reconstrain_unchecked,
    uni_dir,
};
pub use sequence::{Indexed, IndexedValue, LazySequence, Yield};
pub use slicing::{dropping, taking};
pub use standard_optics::{
    ParseIntError, ParseIntErrorKind, add, identity, iterating, parse_int, tuple_first,
    tuple_second,
};
pub use traversal::traversal;
pub use view::{Infallible, Reversible, Single, Writable};
