use std::fmt;

use rand::Rng;

use crate::config::{MAX_VALUE, MIN_VALUE};

/// One bar of the visualisation.
///
/// `id` is fixed at generation and only keeps rendering stable across
/// reorderings; no driver ever compares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub value: u32,
    pub id: u32,
    pub comparing: bool,
    pub swapping: bool,
    pub sorted: bool,
    pub pivot: bool,
}

impl Element {
    pub fn new(value: u32, id: u32) -> Self {
        Element {
            value,
            id,
            comparing: false,
            swapping: false,
            sorted: false,
            pivot: false,
        }
    }

    pub fn clear_transient(&mut self) {
        self.comparing = false;
        self.swapping = false;
    }

    pub fn clear_flags(&mut self) {
        self.clear_transient();
        self.sorted = false;
        self.pivot = false;
    }

    /// Final state of every element after a completed run.
    pub fn settle(&mut self) {
        self.clear_flags();
        self.sorted = true;
    }

    pub fn is_settled(&self) -> bool {
        self.sorted && !self.comparing && !self.swapping && !self.pivot
    }

    pub fn highlight(&self) -> Highlight {
        if self.sorted {
            Highlight::Sorted
        } else if self.pivot {
            Highlight::Pivot
        } else if self.swapping {
            Highlight::Swapping
        } else if self.comparing {
            Highlight::Comparing
        } else {
            Highlight::Unsorted
        }
    }
}

/// The single visual class a renderer should draw an element with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Unsorted,
    Comparing,
    Swapping,
    Pivot,
    Sorted,
}

impl Highlight {
    /// Legend order, as shown below the bars.
    pub const LEGEND: [Highlight; 5] = [
        Highlight::Unsorted,
        Highlight::Comparing,
        Highlight::Swapping,
        Highlight::Pivot,
        Highlight::Sorted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Highlight::Unsorted => "Unsorted",
            Highlight::Comparing => "Comparing",
            Highlight::Swapping => "Swapping",
            Highlight::Pivot => "Pivot",
            Highlight::Sorted => "Sorted",
        }
    }
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `n` fresh elements with uniform values in `MIN_VALUE..=MAX_VALUE` and ids `0..n`.
pub fn generate_elements<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Element> {
    (0..n)
        .map(|i| Element::new(rng.gen_range(MIN_VALUE..=MAX_VALUE), i as u32))
        .collect()
}

/// Elements with the given values and ids in input order. Flags cleared.
pub fn from_values(values: &[u32]) -> Vec<Element> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| Element::new(value, i as u32))
        .collect()
}

pub fn clear_transient(arr: &mut [Element]) {
    for el in arr.iter_mut() {
        el.clear_transient();
    }
}

pub fn clear_flags(arr: &mut [Element]) {
    for el in arr.iter_mut() {
        el.clear_flags();
    }
}

pub fn settle_all(arr: &mut [Element]) {
    for el in arr.iter_mut() {
        el.settle();
    }
}
