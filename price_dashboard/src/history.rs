//! Bounded price history shown on the chart.
//!
//! Timestamps and prices are kept as pairs, so the two series handed to the
//! chart can never differ in length.



use std::collections::VecDeque;

use crate::price_info::Quote;



/// Number of points kept on the chart when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 20;



/// Sliding window over the most recent observations, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    points: VecDeque<(String, f64)>,
    capacity: usize,
}



impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}



impl History {
    /// Capacity of 0 is bumped to 1, an empty window would never show data.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            points: VecDeque::new(),
            capacity,
        }
    }


    /// Append a point and evict from the front until capacity holds again.
    pub fn push(&mut self, time_label: String, price: f64) {
        self.points.push_back((time_label, price));

        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }


    pub fn push_quote(&mut self, quote: &Quote) {
        self.push(quote.time_label(), quote.price);
    }


    pub fn clear(&mut self) {
        self.points.clear();
    }


    pub fn len(&self) -> usize {
        self.points.len()
    }


    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }


    pub fn time_labels(&self) -> Vec<String> {
        self.points.iter().map(|(t, _)| t.clone()).collect()
    }


    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|(_, p)| *p).collect()
    }
}
