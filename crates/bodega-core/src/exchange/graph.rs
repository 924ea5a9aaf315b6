//! # Rate Graph
//!
//! Every quote is an edge. Converting is finding the shortest path between
//! two quotes and walking it, dividing against edges walked backwards and
//! multiplying along edges walked forwards.
//!
//! ```text
//!                     ┌──── ×321.03 ────► VES_BCV
//!                     ├──── ×719 ───────► VES_BINANCE ───┐
//!        ┌────────┐   │                                  │ ×(cop/ves)
//!        │  USD   │───┼──── ×3722.47 ───► COP            │
//!        │ pivot  │   ├──── ×3900 ──────► COP_BINANCE ◄──┘
//!        └────────┘   ├──── ×1 ─────────► USD
//!                     └──── ×0.86 ──────► EUR
//!
//!  COP ──► EUR   : ÷3722.47 then ×0.86       (two hops through the pivot)
//!  VES_BINANCE ──► COP_BINANCE : ×(3900/719)  (one hop, peer cross quote)
//! ```

use std::collections::{HashMap, VecDeque};

use rust_decimal::Decimal;

use super::{RateKey, RateTable};

/// A vertex: the USD pivot or one quoted currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateNode {
    Pivot,
    Quote(RateKey),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    from: RateNode,
    to: RateNode,
    /// Units of `to` per unit of `from`.
    weight: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Multiply(Decimal),
    Divide(Decimal),
}

impl Step {
    fn apply(self, amount: Decimal) -> Option<Decimal> {
        match self {
            Step::Multiply(w) => amount.checked_mul(w),
            Step::Divide(w) => amount.checked_div(w),
        }
    }
}

/// Quotes of one [`RateTable`] as a weighted graph.
#[derive(Debug, Clone, Default)]
pub struct RateGraph {
    edges: Vec<Edge>,
}

impl RateGraph {
    /// One pivot edge per positive rate, plus the peer cross quote when
    /// both peer markets are present.
    pub fn from_table(table: &RateTable) -> Self {
        let mut edges: Vec<Edge> = table
            .entries()
            .filter(|(_, e)| e.rate > Decimal::ZERO)
            .map(|(key, e)| Edge {
                from: RateNode::Pivot,
                to: RateNode::Quote(key),
                weight: e.rate,
            })
            .collect();

        if let (Some(ves), Some(cop)) = (
            table.get(RateKey::VesBinance),
            table.get(RateKey::CopBinance),
        ) {
            if let Some(weight) = cop.checked_div(ves).filter(|w| *w > Decimal::ZERO) {
                edges.push(Edge {
                    from: RateNode::Quote(RateKey::VesBinance),
                    to: RateNode::Quote(RateKey::CopBinance),
                    weight,
                });
            }
        }

        RateGraph { edges }
    }

    /// Converts `amount` from one node to another along the fewest-hop path.
    ///
    /// `None` when the nodes aren't connected or an edge weight is zero.
    pub fn convert(&self, amount: Decimal, from: RateNode, to: RateNode) -> Option<Decimal> {
        self.path(from, to)?
            .into_iter()
            .try_fold(amount, |acc, step| step.apply(acc))
    }

    /// Number of edges between two nodes, `None` when unreachable.
    pub fn hops(&self, from: RateNode, to: RateNode) -> Option<usize> {
        self.path(from, to).map(|p| p.len())
    }

    fn neighbours(&self, node: RateNode) -> impl Iterator<Item = (RateNode, Step)> + '_ {
        self.edges.iter().filter_map(move |e| {
            if e.from == node {
                Some((e.to, Step::Multiply(e.weight)))
            } else if e.to == node {
                Some((e.from, Step::Divide(e.weight)))
            } else {
                None
            }
        })
    }

    fn path(&self, from: RateNode, to: RateNode) -> Option<Vec<Step>> {
        let mut came_from: HashMap<RateNode, (RateNode, Step)> = HashMap::new();
        let mut queue = VecDeque::from([from]);

        while let Some(node) = queue.pop_front() {
            if node == to {
                break;
            }
            for (next, step) in self.neighbours(node) {
                if next != from && !came_from.contains_key(&next) {
                    came_from.insert(next, (node, step));
                    queue.push_back(next);
                }
            }
        }

        let mut steps = Vec::new();
        let mut cursor = to;
        while cursor != from {
            let (prev, step) = *came_from.get(&cursor)?;
            steps.push(step);
            cursor = prev;
        }
        steps.reverse();
        Some(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::RateOrigin;
    use rust_decimal_macros::dec;

    fn table(rates: &[(RateKey, Decimal)]) -> RateTable {
        let mut t = RateTable::default();
        for (k, r) in rates {
            t.set(*k, *r, RateOrigin::Manual);
        }
        t
    }

    #[test]
    fn test_pivot_path() {
        let graph = RateGraph::from_table(&table(&[
            (RateKey::Usd, dec!(1)),
            (RateKey::Cop, dec!(4000)),
        ]));
        let usd = RateNode::Quote(RateKey::Usd);
        let cop = RateNode::Quote(RateKey::Cop);

        assert_eq!(graph.convert(dec!(100), usd, cop), Some(dec!(400000)));
        assert_eq!(graph.convert(dec!(400000), cop, usd), Some(dec!(100)));
        assert_eq!(graph.hops(usd, cop), Some(2));
    }

    #[test]
    fn test_peer_cross_quote_is_one_hop() {
        let graph = RateGraph::from_table(&table(&[
            (RateKey::VesBinance, dec!(700)),
            (RateKey::CopBinance, dec!(3850)),
        ]));
        let ves = RateNode::Quote(RateKey::VesBinance);
        let cop = RateNode::Quote(RateKey::CopBinance);

        assert_eq!(graph.hops(ves, cop), Some(1));
        assert_eq!(graph.convert(dec!(1400), ves, cop), Some(dec!(7700)));
        assert_eq!(graph.convert(dec!(7700), cop, ves), Some(dec!(1400)));
    }

    #[test]
    fn test_unreachable_and_same_node() {
        let graph = RateGraph::from_table(&table(&[(RateKey::Usd, dec!(1))]));
        let usd = RateNode::Quote(RateKey::Usd);

        assert_eq!(graph.convert(dec!(5), usd, RateNode::Quote(RateKey::Eur)), None);
        assert_eq!(graph.convert(dec!(5), usd, usd), Some(dec!(5)));
    }
}
