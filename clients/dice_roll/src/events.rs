//! Program events carried in transaction logs.
//!
//! Events are emitted as `Program data: <base64>` log lines, where the
//! payload is `sha256("event:<Name>")[..8]` followed by the Borsh-encoded
//! event. A line belongs to whichever program is innermost on the invoke
//! stack at that point, so data lines from CPI callees are not mistaken for
//! ours.

use crate::state::{discriminator, DISCRIMINATOR_LEN};
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use base64::{prelude::BASE64_STANDARD, Engine as _};
use futures::{future, stream, Stream, StreamExt};
use solana_sdk::pubkey::Pubkey;
use tracing::warn;

const PROGRAM_DATA: &str = "Program data: ";

/// A typed event emitted by a program.
pub trait ProgramEvent: AnchorSerialize + AnchorDeserialize + Sized {
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        discriminator("event", Self::NAME)
    }

    /// Encode as the base64 payload of a `Program data:` line.
    fn to_log_data(&self) -> String {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data)
            .expect("serializing into a Vec cannot fail");
        BASE64_STANDARD.encode(data)
    }
}

/// Outcome of one dice bet.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BetResult {
    pub user: Pubkey,
    /// Bet token mint; the default key for SOL bets.
    pub mint: Pubkey,
    pub amount: u64,
    pub target: u8,
    pub roll: u8,
    pub won: bool,
    pub payout: u64,
}

impl ProgramEvent for BetResult {
    const NAME: &'static str = "BetResult";
}

/// Logs of one transaction, as delivered by a logs subscription.
#[derive(Debug, Clone)]
pub struct LogBatch {
    pub signature: String,
    /// The transaction failed; its events never took effect.
    pub failed: bool,
    pub logs: Vec<String>,
}

/// An event together with the transaction that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice<E> {
    pub signature: String,
    pub event: E,
}

fn decode_payload<E: ProgramEvent>(encoded: &str) -> Option<E> {
    let bytes = match BASE64_STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "skipping undecodable program data");
            return None;
        }
    };
    if bytes.len() < DISCRIMINATOR_LEN || bytes[..DISCRIMINATOR_LEN] != E::discriminator() {
        // Some other event type.
        return None;
    }
    match E::deserialize(&mut &bytes[DISCRIMINATOR_LEN..]) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(event = E::NAME, error = %e, "skipping malformed event");
            None
        }
    }
}

/// Extract every `E` emitted by `program_id` from one transaction's logs.
pub fn parse_events<E: ProgramEvent>(program_id: &Pubkey, logs: &[String]) -> Vec<E> {
    let program = program_id.to_string();
    let mut stack: Vec<&str> = Vec::new();
    let mut events = Vec::new();

    for line in logs {
        if let Some(encoded) = line.strip_prefix(PROGRAM_DATA) {
            if stack.last() == Some(&program.as_str()) {
                events.extend(decode_payload::<E>(encoded));
            }
            continue;
        }
        let Some(rest) = line.strip_prefix("Program ") else {
            continue;
        };
        let mut words = rest.split_whitespace();
        match (words.next(), words.next()) {
            (Some(id), Some("invoke")) => stack.push(id),
            (Some(_), Some("success")) | (Some(_), Some("failed:")) => {
                stack.pop();
            }
            _ => {}
        }
    }
    events
}

/// Turn a stream of log batches into a stream of `E` events.
///
/// Failed transactions are skipped. Each emitted event is yielded at most
/// once per batch received; batches lost by the transport are not replayed.
pub fn events<E, S>(program_id: Pubkey, batches: S) -> impl Stream<Item = Notice<E>>
where
    E: ProgramEvent,
    S: Stream<Item = LogBatch>,
{
    batches
        .filter(|batch| future::ready(!batch.failed))
        .flat_map(move |batch| {
            let parsed = parse_events::<E>(&program_id, &batch.logs);
            let signature = batch.signature;
            stream::iter(parsed.into_iter().map(move |event| Notice {
                signature: signature.clone(),
                event,
            }))
        })
}

/// Bet results emitted by the dice program.
pub fn bet_results<S>(dice_program: Pubkey, batches: S) -> impl Stream<Item = Notice<BetResult>>
where
    S: Stream<Item = LogBatch>,
{
    events::<BetResult, S>(dice_program, batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(won: bool) -> BetResult {
        BetResult {
            user: Pubkey::new_unique(),
            mint: Pubkey::default(),
            amount: 5_000,
            target: 3,
            roll: if won { 2 } else { 5 },
            won,
            payout: if won { 9_800 } else { 0 },
        }
    }

    fn logs_for(program: &Pubkey, event: &BetResult) -> Vec<String> {
        vec![
            format!("Program {program} invoke [1]"),
            "Program log: Instruction: PlaceSolBet".to_string(),
            format!("Program data: {}", event.to_log_data()),
            format!("Program {program} consumed 12000 of 200000 compute units"),
            format!("Program {program} success"),
        ]
    }

    #[test]
    fn test_parse_single_event() {
        let program = Pubkey::new_unique();
        let event = sample(true);
        let parsed = parse_events::<BetResult>(&program, &logs_for(&program, &event));
        assert_eq!(parsed, vec![event]);
    }

    #[test]
    fn test_ignores_other_programs_data() {
        let program = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let ours = sample(false);
        let theirs = sample(true);
        let logs = vec![
            format!("Program {program} invoke [1]"),
            format!("Program {other} invoke [2]"),
            format!("Program data: {}", theirs.to_log_data()),
            format!("Program {other} success"),
            format!("Program data: {}", ours.to_log_data()),
            format!("Program {program} success"),
        ];
        assert_eq!(parse_events::<BetResult>(&program, &logs), vec![ours]);
        assert_eq!(parse_events::<BetResult>(&other, &logs), vec![theirs]);
    }

    #[test]
    fn test_skips_garbage_payloads() {
        let program = Pubkey::new_unique();
        let logs = vec![
            format!("Program {program} invoke [1]"),
            "Program data: not-base64!!".to_string(),
            format!("Program data: {}", BASE64_STANDARD.encode([1u8; 4])),
            format!("Program {program} success"),
        ];
        assert!(parse_events::<BetResult>(&program, &logs).is_empty());
    }

    #[tokio::test]
    async fn test_stream_skips_failed_transactions() {
        let program = Pubkey::new_unique();
        let kept = sample(true);
        let dropped = sample(false);
        let batches = vec![
            LogBatch {
                signature: "failed".into(),
                failed: true,
                logs: logs_for(&program, &dropped),
            },
            LogBatch {
                signature: "ok".into(),
                failed: false,
                logs: logs_for(&program, &kept),
            },
        ];
        let notices: Vec<_> = bet_results(program, stream::iter(batches)).collect().await;
        assert_eq!(
            notices,
            vec![Notice {
                signature: "ok".into(),
                event: kept
            }]
        );
    }
}
