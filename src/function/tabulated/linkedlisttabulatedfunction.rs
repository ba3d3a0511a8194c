use tracing::{
    debug,
    trace
};

use crate::function::functionerror::{
    FunctionError,
    FunctionResult,
    check_index,
    validate_samples
};
use crate::function::mathfunction::MathFunction;
use crate::function::point::Point;
use crate::function::tabulated::interpolation::{
    InterpolationAccess,
    apply_or_nan,
    interpolate,
    interpolate_within
};
use crate::function::tabulated::tabulatedfunction::{
    Insertable,
    Removable,
    StorageKind,
    TabulatedFunction,
    sample_function
};

// ─────────────────────────────────────────────
// Node slab
// ─────────────────────────────────────────────
//
// Nodes live in a Vec and refer to each other by slot index. The chain is
// circular: `nodes[head].prev` is always the rightmost node. Slots freed by
// `remove` go to `vacant` and are reused by the next insertion.

#[derive(Debug, Clone, Copy)]
struct Node {
    x: f64,
    y: f64,
    prev: usize,
    next: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LinkedListTabulatedFunction {
    nodes: Vec<Node>,
    vacant: Vec<usize>,
    head: Option<usize>,
    count: usize,
}

impl LinkedListTabulatedFunction {
    pub fn new(x_values: &[f64], y_values: &[f64]) -> FunctionResult<LinkedListTabulatedFunction> {
        validate_samples(x_values, y_values)?;
        Ok(Self::with_samples(x_values, y_values))
    }

    pub fn from_function<F: MathFunction + ?Sized>(
        source: &F,
        from: f64,
        to: f64,
        count: usize,
    ) -> FunctionResult<LinkedListTabulatedFunction> {
        let (x_values, y_values) = sample_function(source, from, to, count)?;
        Ok(Self::with_samples(&x_values, &y_values))
    }

    /// One-point chain, as left by a single insertion into an empty one.
    pub fn single(x: f64, y: f64) -> LinkedListTabulatedFunction {
        Self::with_samples(&[x], &[y])
    }

    fn with_samples(x_values: &[f64], y_values: &[f64]) -> LinkedListTabulatedFunction {
        let mut function = LinkedListTabulatedFunction {
            nodes: Vec::with_capacity(x_values.len()),
            ..Default::default()
        };
        for (&x, &y) in x_values.iter().zip(y_values) {
            function.add_node(x, y);
        }
        function
    }

    fn allocate(&mut self, x: f64, y: f64) -> usize {
        match self.vacant.pop() {
            Some(handle) => {
                self.nodes[handle] = Node { x, y, prev: handle, next: handle };
                handle
            }
            None => {
                let handle = self.nodes.len();
                self.nodes.push(Node { x, y, prev: handle, next: handle });
                handle
            }
        }
    }

    /// Splices the detached node `handle` right after `anchor`.
    fn link_after(&mut self, handle: usize, anchor: usize) {
        let next = self.nodes[anchor].next;
        self.nodes[handle].prev = anchor;
        self.nodes[handle].next = next;
        self.nodes[anchor].next = handle;
        self.nodes[next].prev = handle;
    }

    /// Appends after the rightmost node, bootstrapping an empty chain.
    fn add_node(&mut self, x: f64, y: f64) {
        let handle = self.allocate(x, y);
        match self.head {
            None => self.head = Some(handle),
            Some(head) => {
                let tail = self.nodes[head].prev;
                self.link_after(handle, tail);
            }
        }
        self.count += 1;
    }

    fn tail(&self) -> Option<usize> {
        self.head.map(|head| self.nodes[head].prev)
    }

    fn point(&self, handle: usize) -> Point {
        Point::new(self.nodes[handle].x, self.nodes[handle].y)
    }

    /// Walks from whichever end is closer to `index`.
    fn node_at(&self, index: usize) -> FunctionResult<usize> {
        check_index(index, self.count)?;
        let head = self.head.ok_or(FunctionError::IndexOutOfBounds { index, count: 0 })?;
        let mut handle = head;
        if index <= self.count / 2 {
            for _ in 0..index {
                handle = self.nodes[handle].next;
            }
        } else {
            for _ in index..self.count {
                handle = self.nodes[handle].prev;
            }
        }
        Ok(handle)
    }

    fn handles(&self) -> Handles<'_> {
        Handles {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.count,
        }
    }

    /// `(index, handle)` of the node with the greatest x not exceeding `x`.
    ///
    /// At or beyond the rightmost node the rightmost node itself is returned.
    fn floor_node_of_x(&self, x: f64) -> FunctionResult<(usize, usize)> {
        if x.is_nan() {
            return Err(FunctionError::NanX);
        }
        let (head, tail) = match (self.head, self.tail()) {
            (Some(head), Some(tail)) => (head, tail),
            _ => return Err(FunctionError::IndexOutOfBounds { index: 0, count: 0 }),
        };
        if x < self.nodes[head].x {
            return Err(FunctionError::BelowLeftBound { x, left_bound: self.nodes[head].x });
        }
        if x >= self.nodes[tail].x {
            return Ok((self.count - 1, tail));
        }
        let mut index = 0;
        let mut handle = head;
        while self.nodes[self.nodes[handle].next].x <= x {
            handle = self.nodes[handle].next;
            index += 1;
        }
        Ok((index, handle))
    }
}

struct Handles<'a> {
    nodes: &'a [Node],
    cursor: Option<usize>,
    remaining: usize,
}

impl Iterator for Handles<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.cursor?;
        self.cursor = Some(self.nodes[handle].next);
        self.remaining -= 1;
        Some(handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl InterpolationAccess for LinkedListTabulatedFunction {
    fn domain(&self) -> (f64, f64) {
        (self.left_bound(), self.right_bound())
    }

    fn exact_y(&self, x: f64) -> Option<f64> {
        self.handles()
            .find(|&h| self.nodes[h].x == x)
            .map(|h| self.nodes[h].y)
    }

    fn floor_index(&self, x: f64) -> FunctionResult<usize> {
        self.floor_node_of_x(x).map(|(index, _)| index)
    }

    fn extrapolate_left(&self, x: f64) -> f64 {
        trace!(x, "extrapolating left");
        match self.head {
            Some(head) => interpolate(x, self.point(head), self.point(self.nodes[head].next)),
            None => f64::NAN,
        }
    }

    fn extrapolate_right(&self, x: f64) -> f64 {
        trace!(x, "extrapolating right");
        match self.tail() {
            Some(tail) => interpolate(x, self.point(self.nodes[tail].prev), self.point(tail)),
            None => f64::NAN,
        }
    }

    fn interpolate_at(&self, x: f64, floor_index: usize) -> FunctionResult<f64> {
        if floor_index + 1 >= self.count {
            return Err(FunctionError::InterpolationRange {
                x,
                left_x: self.left_bound(),
                right_x: self.right_bound(),
            });
        }
        let left = self.node_at(floor_index)?;
        interpolate_within(x, self.point(left), self.point(self.nodes[left].next))
    }
}

impl MathFunction for LinkedListTabulatedFunction {
    fn apply(&self, x: f64) -> f64 {
        apply_or_nan(self, x)
    }
}

impl TabulatedFunction for LinkedListTabulatedFunction {
    fn count(&self) -> usize {
        self.count
    }

    fn get_x(&self, index: usize) -> FunctionResult<f64> {
        self.node_at(index).map(|h| self.nodes[h].x)
    }

    fn get_y(&self, index: usize) -> FunctionResult<f64> {
        self.node_at(index).map(|h| self.nodes[h].y)
    }

    fn set_y(&mut self, index: usize, value: f64) -> FunctionResult<()> {
        let handle = self.node_at(index)?;
        self.nodes[handle].y = value;
        Ok(())
    }

    fn index_of_x(&self, x: f64) -> Option<usize> {
        self.handles()
            .take_while(|&h| self.nodes[h].x <= x)
            .position(|h| self.nodes[h].x == x)
    }

    fn index_of_y(&self, y: f64) -> Option<usize> {
        self.handles().position(|h| self.nodes[h].y == y)
    }

    fn left_bound(&self) -> f64 {
        self.head.map_or(f64::NAN, |head| self.nodes[head].x)
    }

    fn right_bound(&self) -> f64 {
        self.tail().map_or(f64::NAN, |tail| self.nodes[tail].x)
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::LinkedList
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        Box::new(self.handles().map(|h| self.point(h)))
    }
}

impl Insertable for LinkedListTabulatedFunction {
    fn insert(&mut self, x: f64, y: f64) -> FunctionResult<()> {
        if x.is_nan() {
            return Err(FunctionError::NanX);
        }
        let (head, tail) = match (self.head, self.tail()) {
            (Some(head), Some(tail)) => (head, tail),
            _ => {
                self.add_node(x, y);
                return Ok(());
            }
        };
        let existing = self.handles().find(|&h| self.nodes[h].x == x);
        if let Some(handle) = existing {
            self.nodes[handle].y = y;
            return Ok(());
        }
        if x < self.nodes[head].x {
            // Linking after the tail of a circular chain places the node
            // right before the old head.
            let handle = self.allocate(x, y);
            self.link_after(handle, tail);
            self.head = Some(handle);
        } else if x > self.nodes[tail].x {
            let handle = self.allocate(x, y);
            self.link_after(handle, tail);
        } else {
            let (_, floor) = self.floor_node_of_x(x)?;
            let handle = self.allocate(x, y);
            self.link_after(handle, floor);
        }
        self.count += 1;
        debug!(x, count = self.count, "inserted node");
        Ok(())
    }
}

impl Removable for LinkedListTabulatedFunction {
    fn remove(&mut self, index: usize) -> FunctionResult<()> {
        check_index(index, self.count)?;
        if self.count <= 2 {
            return Err(FunctionError::MinimumPointCount { count: self.count });
        }
        let handle = self.node_at(index)?;
        let Node { prev, next, .. } = self.nodes[handle];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        if self.head == Some(handle) {
            self.head = Some(next);
        }
        self.nodes[handle].prev = handle;
        self.nodes[handle].next = handle;
        self.vacant.push(handle);
        self.count -= 1;
        debug!(index, count = self.count, "removed node");
        Ok(())
    }
}
