//! Prompt builders for per-ticket summaries and the final answer.

use crate::api_types::TicketSummary;

/// Separator between fragment texts of one ticket.
pub const FRAGMENT_JOINER: &str = " ";

pub fn summary_prompt(full_text: &str) -> String {
    format!("Summarize the following support ticket concisely: {full_text}")
}

/// Enumerates summaries `1..N` as `Ticket {i} (ID: {id}):\n{summary}`,
/// separated by blank lines.
pub fn format_summaries(summaries: &[TicketSummary]) -> String {
    summaries
        .iter()
        .enumerate()
        .map(|(i, s)| format!("Ticket {} (ID: {}):\n{}", i + 1, s.ticket_id, s.summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn answer_prompt(query: &str, summaries: &[TicketSummary]) -> String {
    format!(
        "Based only on the following ticket summaries, answer this question: {query}\n\n\
         TICKET SUMMARIES:\n{}\n\nAnswer:",
        format_summaries(summaries)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::TicketId;

    fn summary(id: TicketId, text: &str) -> TicketSummary {
        TicketSummary {
            ticket_id: id,
            summary: text.into(),
            metadata: Default::default(),
        }
    }

    #[test]
    fn summaries_are_numbered_from_one() {
        let s = [
            summary(TicketId::Text("T1".into()), "refund approved"),
            summary(TicketId::Int(88), "refund denied"),
        ];
        assert_eq!(
            format_summaries(&s),
            "Ticket 1 (ID: T1):\nrefund approved\n\nTicket 2 (ID: 88):\nrefund denied"
        );
    }

    #[test]
    fn answer_prompt_embeds_query_and_block() {
        let s = [summary(TicketId::Text("T1".into()), "x")];
        let p = answer_prompt("refund policy", &s);
        assert!(p.starts_with(
            "Based only on the following ticket summaries, answer this question: refund policy\n\n"
        ));
        assert!(p.contains("TICKET SUMMARIES:\nTicket 1 (ID: T1):\nx"));
        assert!(p.ends_with("\n\nAnswer:"));
    }
}
