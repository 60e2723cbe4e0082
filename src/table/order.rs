//! Column display order.
//!
//! Columns are addressed by their declaration index but drawn in display
//! order. [`DisplayOrder`] stores both directions of the permutation and only
//! hands out mutations that keep them inverse of each other.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOrder {
    /// display order -> column index
    to_index: Vec<usize>,
    /// column index -> display order
    to_order: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("display order {0:?} is not a permutation")]
pub struct InvalidDisplayOrder(pub Vec<usize>);

impl DisplayOrder {
    pub fn identity(count: usize) -> Self {
        Self {
            to_index: (0..count).collect(),
            to_order: (0..count).collect(),
        }
    }

    /// Build from the display order of every column (indexed by column).
    pub fn from_column_orders(orders: &[usize]) -> Result<Self, InvalidDisplayOrder> {
        let mut to_index = vec![usize::MAX; orders.len()];
        for (column, &order) in orders.iter().enumerate() {
            match to_index.get_mut(order) {
                Some(slot) if *slot == usize::MAX => *slot = column,
                _ => return Err(InvalidDisplayOrder(orders.to_vec())),
            }
        }
        Ok(Self {
            to_index,
            to_order: orders.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_index.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.to_index.iter().enumerate().all(|(i, &c)| i == c)
    }

    /// Column shown at display position `order`.
    pub fn column_at(&self, order: usize) -> usize {
        self.to_index[order]
    }

    /// Display position of `column`.
    pub fn order_of(&self, column: usize) -> usize {
        self.to_order[column]
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[usize] {
        &self.to_index
    }

    /// Move the column at display position `from` to `to`, shifting the
    /// columns in between by one.
    pub fn move_to(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let column = self.to_index.remove(from);
        self.to_index.insert(to, column);
        self.rebuild_orders();
    }

    /// Change the number of columns. Existing columns keep their relative
    /// order; new ones are appended.
    pub fn resize(&mut self, count: usize) {
        if count == self.len() {
            return;
        }
        self.to_index.retain(|&c| c < count);
        for c in self.to_order.len()..count {
            self.to_index.push(c);
        }
        self.rebuild_orders();
    }

    fn rebuild_orders(&mut self) {
        self.to_order.clear();
        self.to_order.resize(self.to_index.len(), 0);
        for (order, &column) in self.to_index.iter().enumerate() {
            self.to_order[column] = order;
        }
    }

    /// Both directions agree and cover `0..len` exactly once.
    pub fn is_consistent(&self) -> bool {
        self.to_index.len() == self.to_order.len()
            && self
                .to_index
                .iter()
                .enumerate()
                .all(|(order, &column)| self.to_order.get(column) == Some(&order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_keeps_bijection() {
        let mut order = DisplayOrder::identity(4);
        order.move_to(2, 0);
        assert_eq!(order.columns(), &[2, 0, 1, 3]);
        assert_eq!(order.order_of(2), 0);
        assert_eq!(order.order_of(1), 2);
        assert!(order.is_consistent());
        assert!(!order.is_identity());
    }

    #[test]
    fn test_rejects_duplicates_and_gaps() {
        assert!(DisplayOrder::from_column_orders(&[0, 0, 1]).is_err());
        assert!(DisplayOrder::from_column_orders(&[0, 3, 1]).is_err());
        let order = DisplayOrder::from_column_orders(&[1, 2, 0]).unwrap();
        assert_eq!(order.columns(), &[2, 0, 1]);
    }

    #[test]
    fn test_resize_preserves_relative_order() {
        let mut order = DisplayOrder::identity(3);
        order.move_to(0, 2);
        order.resize(4);
        assert_eq!(order.columns(), &[1, 2, 0, 3]);
        order.resize(2);
        assert_eq!(order.columns(), &[1, 0]);
        assert!(order.is_consistent());
    }
}
