//! A computer player's turn: roll, decide, lower flaps, repeat.

use stb_core::{Dice, DicePolicy, FlapBox, FlapSet, FlapStrategy};
use stb_engine::DecisionEngine;
use stb_logging::{now_ms, NdjsonWriter, RollEventV1, TurnEventV1, VersionInfoV1};

use crate::SimError;

/// What happened on one roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    pub open_before: FlapSet,
    pub dice_rolled: u8,
    pub total: u32,
    /// Flaps lowered, ascending; `None` if nothing could be lowered.
    pub closed: Option<Vec<u8>>,
}

/// Result of a finished turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnResult {
    /// Sum of the flaps still up.
    pub score: u32,
    pub rolls: u32,
    pub shut: bool,
}

/// NDJSON sink for roll and turn events.
pub struct EventLog {
    writer: NdjsonWriter,
    run_id: String,
}

impl EventLog {
    pub fn new(writer: NdjsonWriter, run_id: impl Into<String>) -> Self {
        Self {
            writer,
            run_id: run_id.into(),
        }
    }

    pub fn flush(&mut self) -> Result<(), SimError> {
        Ok(self.writer.flush()?)
    }
}

/// Drives turns for one box and one set of dice.
pub struct ComputerTurn<'a> {
    engine: &'a DecisionEngine,
    flap_box: FlapBox,
    dice: Dice,
    strategy: FlapStrategy,
    policy: DicePolicy,
    debug: bool,
    events: Option<EventLog>,
    turn_idx: u64,
    roll_idx: u32,
}

impl<'a> ComputerTurn<'a> {
    /// The box gets the engine's flap count; `dice` should hold the engine's dice count.
    pub fn new(
        engine: &'a DecisionEngine,
        dice: Dice,
        strategy: FlapStrategy,
        policy: DicePolicy,
    ) -> Result<Self, SimError> {
        if dice.num_dice() != engine.settings().num_dice {
            return Err(SimError::Mismatch(format!(
                "engine decides for {} dice but {} were supplied",
                engine.settings().num_dice,
                dice.num_dice()
            )));
        }
        Ok(Self {
            engine,
            flap_box: FlapBox::new(engine.settings().num_flaps)?,
            dice,
            strategy,
            policy,
            debug: false,
            events: None,
            turn_idx: 0,
            roll_idx: 0,
        })
    }

    /// Print the box and every roll to stdout.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn flap_box(&self) -> &FlapBox {
        &self.flap_box
    }

    /// Mutable access, e.g. to start from a partly lowered box.
    pub fn flap_box_mut(&mut self) -> &mut FlapBox {
        &mut self.flap_box
    }

    pub fn turns_played(&self) -> u64 {
        self.turn_idx
    }

    /// Flush and hand back the event log, if any.
    pub fn finish(mut self) -> Result<Option<EventLog>, SimError> {
        if let Some(ev) = self.events.as_mut() {
            ev.flush()?;
        }
        Ok(self.events)
    }

    fn trace(&self, msg: &str) {
        if self.debug {
            println!("{msg}");
        } else {
            stb_logging::debug_log!("{msg}");
        }
    }

    /// Roll once and lower whatever the strategy picks.
    pub fn perform_roll(&mut self) -> Result<RollOutcome, SimError> {
        let open = self.flap_box.open_flaps();
        let dice_rolled = self.engine.dice_to_roll(open, self.policy);
        self.trace(if dice_rolled == 1 {
            "Rolling single die"
        } else {
            "Rolling all dice"
        });

        let total = self.dice.roll(dice_rolled)?;
        self.trace(&format!("Dice total: {total}"));

        let closed = self
            .engine
            .choose_flaps(self.strategy, open, total, self.policy)?;
        match &closed {
            Some(flaps) => {
                self.trace(&format!("Lowering flaps: {flaps:?}"));
                self.flap_box.lower_all(flaps)?;
            }
            None => self.trace("Impossible to lower any flaps"),
        }

        self.roll_idx += 1;
        if let Some(ev) = self.events.as_mut() {
            ev.writer.write_event(&RollEventV1 {
                event: "roll".to_string(),
                ts_ms: now_ms(),
                v: VersionInfoV1::default(),
                run_id: ev.run_id.clone(),
                turn: self.turn_idx,
                roll: self.roll_idx,
                open_before: open.to_vec(),
                dice_rolled,
                total,
                closed: closed.clone().unwrap_or_default(),
                flap_strategy: self.strategy.name().to_string(),
                dice_policy: self.policy.name().to_string(),
            })?;
        }

        Ok(RollOutcome {
            open_before: open,
            dice_rolled,
            total,
            closed,
        })
    }

    /// Roll until the box is shut or nothing can be lowered, then reset the box.
    pub fn perform_turn(&mut self) -> Result<TurnResult, SimError> {
        self.turn_idx += 1;
        self.roll_idx = 0;
        self.dice.start_turn();

        if self.debug {
            println!("{}", self.flap_box);
            println!("Flap sum: {}", self.flap_box.sum_open());
        }

        let mut rolls = 0u32;
        while !self.flap_box.is_shut() {
            let outcome = self.perform_roll()?;
            rolls += 1;
            if outcome.closed.is_none() {
                break;
            }
            if self.debug {
                println!("\n{}", self.flap_box);
                println!("Flap sum: {}", self.flap_box.sum_open());
            }
        }

        let score = self.flap_box.sum_open();
        let result = TurnResult {
            score,
            rolls,
            shut: score == 0,
        };

        if let Some(ev) = self.events.as_mut() {
            ev.writer.write_event(&TurnEventV1 {
                event: "turn".to_string(),
                ts_ms: now_ms(),
                v: VersionInfoV1::default(),
                run_id: ev.run_id.clone(),
                turn: self.turn_idx,
                rolls,
                score,
                shut: result.shut,
            })?;
        }

        self.flap_box.reset();
        Ok(result)
    }
}
