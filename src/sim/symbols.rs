//! Symbol pool: no two live balloons show the same letter or digit

use std::collections::HashSet;

use rand::Rng;

use super::balloon::Symbol;
use crate::consts::{DIGIT_COUNT, LETTER_COUNT};

#[derive(Debug, Clone)]
pub struct SymbolPool {
    letters: Vec<u8>,
    digits: Vec<u8>,
    used: HashSet<Symbol>,
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolPool {
    pub fn new() -> Self {
        Self {
            letters: (0..LETTER_COUNT).collect(),
            digits: (0..DIGIT_COUNT).collect(),
            used: HashSet::new(),
        }
    }

    /// Make every symbol available again (new game)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Draw a random unused symbol
    pub fn take<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Symbol {
        if self.letters.is_empty() && self.digits.is_empty() {
            self.refill();
        }

        let use_digit = match (self.letters.is_empty(), self.digits.is_empty()) {
            (false, false) => rng.random_bool(0.5),
            (true, _) => true,
            (false, true) => false,
        };

        let symbol = if use_digit {
            let i = rng.random_range(0..self.digits.len());
            Symbol::Digit(self.digits.swap_remove(i))
        } else {
            let i = rng.random_range(0..self.letters.len());
            Symbol::Letter(self.letters.swap_remove(i))
        };
        self.used.insert(symbol);
        symbol
    }

    /// Return a symbol released by a popped or evicted balloon
    ///
    /// Ignored unless the symbol is currently in use, so a symbol can never be
    /// handed out twice.
    pub fn give_back(&mut self, symbol: Symbol) -> bool {
        if !self.used.remove(&symbol) {
            return false;
        }
        match symbol {
            Symbol::Letter(i) => self.letters.push(i),
            Symbol::Digit(i) => self.digits.push(i),
        }
        true
    }

    /// Both lists ran dry: restock with whatever is not held by a live balloon
    fn refill(&mut self) {
        self.letters = (0..LETTER_COUNT)
            .filter(|&i| !self.used.contains(&Symbol::Letter(i)))
            .collect();
        self.digits = (0..DIGIT_COUNT)
            .filter(|&i| !self.used.contains(&Symbol::Digit(i)))
            .collect();

        if self.letters.is_empty() && self.digits.is_empty() {
            log::debug!("Every symbol is in use, recycling the full set");
            *self = Self::new();
        }
    }

    pub fn is_in_use(&self, symbol: Symbol) -> bool {
        self.used.contains(&symbol)
    }

    pub fn in_use_count(&self) -> usize {
        self.used.len()
    }

    pub fn available_count(&self) -> usize {
        self.letters.len() + self.digits.len()
    }
}
