use crate::model::value::WireValue;

/// A player's hidden wires, kept sorted by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    wires: Vec<WireValue>,
}

impl Hand {
    pub fn new() -> Self {
        Self { wires: Vec::new() }
    }

    pub fn with_wires(wires: Vec<WireValue>) -> Self {
        let mut hand = Self { wires };
        hand.wires.sort_unstable();
        hand
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn wire(&self, position: usize) -> Option<WireValue> {
        self.wires.get(position).copied()
    }

    pub fn contains(&self, value: WireValue) -> bool {
        self.wires.binary_search(&value).is_ok()
    }

    pub fn count_of(&self, value: WireValue) -> usize {
        self.wires.iter().filter(|&&wire| wire == value).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WireValue> {
        self.wires.iter()
    }

    pub fn wires(&self) -> &[WireValue] {
        &self.wires
    }

    /// Positions holding `value`, left to right.
    pub fn positions_of(&self, value: WireValue) -> impl Iterator<Item = usize> + '_ {
        self.wires
            .iter()
            .enumerate()
            .filter(move |(_, &wire)| wire == value)
            .map(|(position, _)| position)
    }

    /// Applies a swap to the owner's view: the wire at `init` leaves and
    /// `received` is slotted in so it ends up at `fin` in the new hand.
    pub fn apply_swap(&mut self, init: usize, fin: usize, received: WireValue) {
        self.wires.remove(init);
        self.wires.insert(fin, received);
    }
}
