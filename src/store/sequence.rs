// src/store/sequence.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};

// Numeração de documentos com sequência monotônica por processo, no
// formato de exibição original (WO-{ano}-{seq}, REQ-{ano}{mês}-{seq}).
// A sequência substitui o sufixo aleatório de 4 dígitos da origem, que
// não garantia unicidade.
#[derive(Clone, Default)]
pub struct DocumentSequences {
    inner: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    work_orders: AtomicU64,
    requisitions: AtomicU64,
    adjustments: AtomicU64,
    movements: AtomicU64,
}

impl DocumentSequences {
    pub fn new() -> Self {
        Self::default()
    }

    // Retorna o par (número externo, número interno) da ordem.
    pub fn next_work_order_numbers(&self, now: DateTime<Utc>) -> (String, String) {
        let seq = self.inner.work_orders.fetch_add(1, Ordering::Relaxed) + 1;
        let year = now.year();
        (
            format!("WO-{}-{:03}", year, seq),
            format!("INT-{}-{:03}", year, seq),
        )
    }

    pub fn next_requisition_number(&self, now: DateTime<Utc>) -> String {
        let seq = self.inner.requisitions.fetch_add(1, Ordering::Relaxed) + 1;
        format!("REQ-{}{:02}-{:04}", now.year(), now.month(), seq)
    }

    pub fn next_adjustment_number(&self, now: DateTime<Utc>) -> String {
        let seq = self.inner.adjustments.fetch_add(1, Ordering::Relaxed) + 1;
        format!("ADJ-{}{:02}-{:04}", now.year(), now.month(), seq)
    }

    pub fn next_movement_number(&self, now: DateTime<Utc>) -> String {
        let seq = self.inner.movements.fetch_add(1, Ordering::Relaxed) + 1;
        format!("MOV-{}{:02}-{:04}", now.year(), now.month(), seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequencias_sao_crescentes_e_independentes() {
        let sequences = DocumentSequences::new();
        let now = Utc::now();

        let (wo1, int1) = sequences.next_work_order_numbers(now);
        let (wo2, _) = sequences.next_work_order_numbers(now);
        assert!(wo1.ends_with("-001"));
        assert!(int1.starts_with("INT-"));
        assert!(wo2.ends_with("-002"));

        // A sequência de requisições não é afetada pelas ordens.
        let req = sequences.next_requisition_number(now);
        assert!(req.ends_with("-0001"), "req = {}", req);
    }

    #[test]
    fn formato_contem_ano_e_mes() {
        let sequences = DocumentSequences::new();
        let now = Utc::now();
        let adj = sequences.next_adjustment_number(now);
        let expected_prefix = format!("ADJ-{}{:02}-", now.year(), now.month());
        assert!(adj.starts_with(&expected_prefix), "adj = {}", adj);
    }
}
