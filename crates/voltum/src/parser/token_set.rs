use crate::syntax_kind::SyntaxKind;

/// Bitset over terminal kinds, used for FIRST and synchronization sets.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn new(kinds: &[SyntaxKind]) -> TokenSet {
        let mut bits = 0u128;
        let mut index = 0;
        while index < kinds.len() {
            bits |= mask(kinds[index]);
            index += 1;
        }
        TokenSet(bits)
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        (kind as usize) < 128 && self.0 & mask(kind) != 0
    }
}

const fn mask(kind: SyntaxKind) -> u128 {
    1u128 << (kind as usize)
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut set = f.debug_set();
        for raw in 0..128u16 {
            if let Some(kind) = SyntaxKind::from_raw(raw) {
                if self.contains(kind) {
                    set.entry(&kind);
                }
            }
        }
        set.finish()
    }
}
