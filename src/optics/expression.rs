//! Descriptive expression trees for optics.
//!
//! Every optic carries an [`Expression`] mirroring the shape of how it was
//! built. Expressions are never executed; they exist for the short inline
//! rendering used by logs and `Display`, and for building the error path that
//! accompanies a failure.
//!
//! # Rendering
//!
//! - A composition renders its children joined with `" | "`.
//! - Any other node renders as `Name(child,...,param,...)`, or just `Name`
//!   when it has neither children nor parameters.
//!
//! ```
//! use opticore::optics::Expression;
//!
//! let parse = Expression::new("ParseInt").param(10).param(0);
//! let composed = Expression::composition("Compose", Expression::new("Traverse"), parse);
//! assert_eq!(composed.to_string(), "Traverse | ParseInt(10,0)");
//!
//! let collected = Expression::new("SliceOf").child(composed).param(3);
//! assert_eq!(collected.to_string(), "SliceOf(Traverse | ParseInt(10,0),3)");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Node {
    name: Cow<'static, str>,
    composition: bool,
    params: SmallVec<[String; 2]>,
    children: SmallVec<[Expression; 2]>,
}

/// An immutable description of an optic.
///
/// Cloning is cheap; the node is shared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Expression(Arc<Node>);

impl Expression {
    /// Creates a leaf description with no parameters.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(Arc::new(Node {
            name: name.into(),
            composition: false,
            params: SmallVec::new(),
            children: SmallVec::new(),
        }))
    }

    /// Creates a composition node. Compositions are transparent in error
    /// paths and render as `left | right`.
    #[must_use]
    pub fn composition(name: impl Into<Cow<'static, str>>, left: Self, right: Self) -> Self {
        let mut children = SmallVec::new();
        children.push(left);
        children.push(right);
        Self(Arc::new(Node {
            name: name.into(),
            composition: true,
            params: SmallVec::new(),
            children,
        }))
    }

    /// Appends a formatted parameter.
    #[must_use]
    pub fn param(mut self, value: impl fmt::Display) -> Self {
        Arc::make_mut(&mut self.0).params.push(value.to_string());
        self
    }

    /// Appends a child description, rendered before the parameters.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        Arc::make_mut(&mut self.0).children.push(child);
        self
    }

    /// The node name, e.g. `"ParseInt"` or `"Compose"`.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The formatted parameters.
    pub fn params(&self) -> &[String] {
        &self.0.params
    }

    /// The child descriptions.
    pub fn children(&self) -> &[Self] {
        &self.0.children
    }

    /// `true` for nodes built with [`Expression::composition`].
    pub fn is_composition(&self) -> bool {
        self.0.composition
    }

    /// The descriptions an error passes when it escapes from inside this
    /// optic's focus, innermost first.
    ///
    /// A composition `left | right` yields the trail of `right` followed by
    /// the trail of `left`; any other node yields itself.
    ///
    /// ```
    /// use opticore::optics::Expression;
    ///
    /// let inner = Expression::composition("Compose", Expression::new("X"), Expression::new("Y"));
    /// let names: Vec<String> = inner.trail().iter().map(ToString::to_string).collect();
    /// assert_eq!(names, vec!["Y", "X"]);
    /// ```
    pub fn trail(&self) -> SmallVec<[Self; 4]> {
        let mut trail = SmallVec::new();
        self.push_trail(&mut trail);
        trail
    }

    fn push_trail(&self, trail: &mut SmallVec<[Self; 4]>) {
        if self.is_composition() {
            for child in self.children().iter().rev() {
                child.push_trail(trail);
            }
        } else {
            trail.push(self.clone());
        }
    }

    /// Renders the full tree, one node per line, indented by depth.
    ///
    /// ```
    /// use opticore::optics::Expression;
    ///
    /// let composed = Expression::composition(
    ///     "Compose",
    ///     Expression::new("Traverse"),
    ///     Expression::new("Add").param(5),
    /// );
    /// assert_eq!(composed.tree(), "Compose\n  Traverse\n  Add(5)\n");
    /// ```
    pub fn tree(&self) -> String {
        let mut output = String::new();
        self.write_tree(&mut output, 0);
        output
    }

    fn write_tree(&self, output: &mut String, depth: usize) {
        for _ in 0..depth {
            output.push_str("  ");
        }
        if self.is_composition() {
            output.push_str(self.name());
            output.push('\n');
            for child in self.children() {
                child.write_tree(output, depth + 1);
            }
        } else {
            output.push_str(&self.to_string());
            output.push('\n');
        }
    }
}

impl From<&'static str> for Expression {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Expression {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_composition() {
            for (position, child) in self.children().iter().enumerate() {
                if position > 0 {
                    formatter.write_str(" | ")?;
                }
                write!(formatter, "{child}")?;
            }
            return Ok(());
        }

        formatter.write_str(self.name())?;
        if self.children().is_empty() && self.params().is_empty() {
            return Ok(());
        }

        formatter.write_str("(")?;
        let arguments = self
            .children()
            .iter()
            .map(ToString::to_string)
            .chain(self.params().iter().cloned());
        for (position, argument) in arguments.enumerate() {
            if position > 0 {
                formatter.write_str(",")?;
            }
            formatter.write_str(&argument)?;
        }
        formatter.write_str(")")
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Expression({self})")
    }
}
