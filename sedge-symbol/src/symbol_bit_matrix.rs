use std::ops::{Deref, DerefMut};

use bit_matrix::BitMatrix;

use crate::{Symbol, SymbolSource};

/// A matrix that represents a relation `R(A, B)` between two symbols.
#[derive(Debug)]
pub struct SymbolBitMatrix {
    bit_matrix: BitMatrix,
}

impl SymbolBitMatrix {
    /// Creates an empty `num_syms` × `num_syms` relation.
    pub fn new(num_syms: usize) -> Self {
        SymbolBitMatrix {
            bit_matrix: BitMatrix::new(num_syms, num_syms),
        }
    }

    pub fn set(&mut self, row: Symbol, col: Symbol, included: bool) {
        self.bit_matrix.set(row.usize(), col.usize(), included);
    }

    /// Checks whether the relation holds for the given pair.
    pub fn get(&self, row: Symbol, col: Symbol) -> bool {
        self.bit_matrix[(row.usize(), col.usize())]
    }

    /// Creates an iterator over symbols which appear in the given row.
    pub fn iter_row_syms(&self, row: Symbol) -> impl Iterator<Item = Symbol> + '_ {
        self.bit_matrix
            .iter_row(row.usize())
            .zip(SymbolSource::generate_fresh())
            .filter_map(|(present, sym)| if present { Some(sym) } else { None })
    }
}

impl Deref for SymbolBitMatrix {
    type Target = BitMatrix;
    fn deref(&self) -> &Self::Target {
        &self.bit_matrix
    }
}

impl DerefMut for SymbolBitMatrix {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bit_matrix
    }
}
