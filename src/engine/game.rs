//! The game lifecycle: lobby, rounds, bids, resolutions, game end.
//!
//! ```text
//! LOBBY ──start──▶ IN_PROGRESS ──last player standing──▶ FINISHED
//! ```
//!
//! While in progress a round is either *open* (bids and calls accepted) or
//! *closed* after a resolution, until the host opens the next one with
//! [`GameEngine::start_next_round`].

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::command::{ActionOutcome, Command, FollowUp, LegalActions, Resolved};
use super::error::ActionError;
use crate::core::{
    Bid, BidRecord, CalzaPolicy, ConfigError, DiceRng, Face, PerudoConfig, Player, Seat, UserId,
    UserRef,
};
use crate::events::{
    ChallengeResolution, EventBus, EventListener, ExactCallResolution, GameEvent, ListenerId,
    Standing,
};
use crate::rules;
use crate::stats::{NullStats, StatsError, StatsSink};

/// Game lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    InProgress,
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Lobby => "lobby",
            Phase::InProgress => "in progress",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// One Perudo table.
///
/// All mutators are synchronous and must be serialized per instance by the
/// host (see [`crate::table::Table`]).
pub struct GameEngine {
    pub(super) config: PerudoConfig,
    pub(super) players: Vec<Player>,
    pub(super) phase: Phase,
    pub(super) round: u32,
    pub(super) turn: usize,
    pub(super) current_bid: Option<Bid>,
    pub(super) palifico: bool,
    pub(super) round_open: bool,
    pub(super) recent_bids: Vector<BidRecord>,
    pub(super) winner: Option<Seat>,
    pub(super) rng: DiceRng,
    pub(super) events: EventBus,
    pub(super) stats: Arc<dyn StatsSink>,
}

impl GameEngine {
    /// Create an empty lobby.
    pub fn new(config: PerudoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = config.seed.map_or_else(DiceRng::from_entropy, DiceRng::new);
        Ok(Self {
            config,
            players: Vec::new(),
            phase: Phase::Lobby,
            round: 0,
            turn: 0,
            current_bid: None,
            palifico: false,
            round_open: false,
            recent_bids: Vector::new(),
            winner: None,
            rng,
            events: EventBus::new(),
            stats: Arc::new(NullStats),
        })
    }

    /// Create a lobby with the host already seated.
    pub fn with_host(host: UserRef, config: PerudoConfig) -> Result<Self, ConfigError> {
        let mut game = Self::new(config)?;
        game.seat(host);
        Ok(game)
    }

    /// Use `stats` for outcome reporting.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<dyn StatsSink>) -> Self {
        self.stats = stats;
        self
    }

    pub fn subscribe(&mut self, listener: impl EventListener + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &PerudoConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rounds started so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// All seats in turn order, eliminated ones included.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    #[must_use]
    pub fn seat_of(&self, user: UserId) -> Option<Seat> {
        self.players
            .iter()
            .position(|p| p.id() == user)
            .map(|i| Seat::new(i as u8))
    }

    /// Whose turn it is, while a game is running.
    #[must_use]
    pub fn current_turn(&self) -> Option<Seat> {
        (self.phase == Phase::InProgress).then(|| Seat::new(self.turn as u8))
    }

    #[must_use]
    pub fn current_bid(&self) -> Option<&Bid> {
        self.current_bid.as_ref()
    }

    #[must_use]
    pub fn is_palifico(&self) -> bool {
        self.palifico
    }

    /// Whether bids and calls are currently accepted.
    #[must_use]
    pub fn is_round_open(&self) -> bool {
        self.phase == Phase::InProgress && self.round_open
    }

    /// Whether a resolution happened and the next round has not started.
    #[must_use]
    pub fn is_round_pending(&self) -> bool {
        self.phase == Phase::InProgress && !self.round_open
    }

    /// Recent bids of this round, oldest first.
    #[must_use]
    pub fn recent_bids(&self) -> &Vector<BidRecord> {
        &self.recent_bids
    }

    #[must_use]
    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    /// A user's hidden dice. Empty when eliminated, `None` when not seated.
    #[must_use]
    pub fn dice_of(&self, user: UserId) -> Option<&[Face]> {
        self.seat_of(user).map(|s| self.players[s.index()].dice())
    }

    /// Players still holding dice.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_eliminated()).count()
    }

    /// Dice on the table across live players.
    #[must_use]
    pub fn total_dice(&self) -> u32 {
        self.players.iter().map(|p| u32::from(p.die_count())).sum()
    }

    /// Smallest legal quantity on `face` for the next bid, if any.
    #[must_use]
    pub fn minimum_bid(&self, face: Face) -> Option<u32> {
        match &self.current_bid {
            None => rules::check_opening(face, self.palifico).ok().map(|()| 1),
            Some(bid) => rules::minimum_raise(bid, face, self.palifico),
        }
    }

    /// Which calls `user` may make right now.
    #[must_use]
    pub fn legal_actions(&self, user: UserId) -> LegalActions {
        if self.acting_seat(user).is_err() {
            return LegalActions::none();
        }
        let has_bid = self.current_bid.is_some();
        LegalActions {
            bid: true,
            challenge: has_bid,
            exact_call: has_bid && self.calza_permitted(),
        }
    }

    // === Lobby ===

    /// Seat a new player.
    pub fn add_player(&mut self, user: UserRef) -> Result<Seat, ActionError> {
        if self.phase != Phase::Lobby {
            return Err(ActionError::NotInLobby);
        }
        if self.seat_of(user.id).is_some() {
            return Err(ActionError::AlreadySeated);
        }
        if self.players.len() >= self.config.max_players {
            return Err(ActionError::TableFull {
                max: self.config.max_players,
            });
        }
        Ok(self.seat(user))
    }

    fn seat(&mut self, user: UserRef) -> Seat {
        let seat = Seat::new(self.players.len() as u8);
        tracing::debug!(target: "perudo.engine", %seat, user = %user.id, "player joined");
        self.players.push(Player::new(user.clone(), self.config.max_dice));
        self.events.publish(&GameEvent::PlayerJoined { seat, user });
        seat
    }

    /// Leave the lobby and open the first round.
    pub fn start(&mut self) -> Result<(), ActionError> {
        if self.phase != Phase::Lobby {
            return Err(ActionError::NotInLobby);
        }
        if self.players.len() < self.config.min_players {
            return Err(ActionError::NotEnoughPlayers {
                min: self.config.min_players,
                have: self.players.len(),
            });
        }
        self.phase = Phase::InProgress;
        self.turn = 0;
        tracing::info!(
            target: "perudo.engine",
            players = self.players.len(),
            seed = self.rng.seed(),
            "game started"
        );
        self.start_round();
        Ok(())
    }

    // === Rounds ===

    /// Open the round that follows a resolution. Returns the new round number.
    pub fn start_next_round(&mut self) -> Result<u32, ActionError> {
        if !self.is_round_pending() {
            return Err(ActionError::NoPendingRound);
        }
        self.start_round();
        Ok(self.round)
    }

    fn start_round(&mut self) {
        let opener = self.turn;
        assert!(
            !self.players[opener].is_eliminated(),
            "round opener {opener} is eliminated"
        );

        self.round += 1;
        self.current_bid = None;
        self.recent_bids.clear();
        self.palifico = self.players[opener].die_count() == 1 && self.live_count() > 2;
        for player in &mut self.players {
            player.roll_dice(&mut self.rng);
        }
        self.round_open = true;

        let opener_seat = Seat::new(opener as u8);
        tracing::info!(
            target: "perudo.engine",
            round = self.round,
            palifico = self.palifico,
            opener = %opener_seat,
            "round started"
        );
        self.events.publish(&GameEvent::RoundStarted {
            round: self.round,
            palifico: self.palifico,
            opener: opener_seat,
            opener_user: self.players[opener].user().clone(),
        });
    }

    /// Validate that `user` may act now; returns their seat.
    fn acting_seat(&self, user: UserId) -> Result<Seat, ActionError> {
        if self.phase != Phase::InProgress {
            return Err(ActionError::NotInProgress);
        }
        if !self.round_open {
            return Err(ActionError::RoundNotOpen);
        }
        let seat = self.seat_of(user).ok_or(ActionError::NotSeated)?;
        if seat.index() != self.turn {
            return Err(ActionError::NotYourTurn);
        }
        Ok(seat)
    }

    fn calza_permitted(&self) -> bool {
        !(self.palifico && self.config.calza_policy == CalzaPolicy::ForbiddenInPalifico)
    }

    /// Next live seat strictly after `index`, wrapping around.
    fn next_live_after(&self, index: usize) -> usize {
        let n = self.players.len();
        (1..=n)
            .map(|step| (index + step) % n)
            .find(|&i| !self.players[i].is_eliminated())
            .unwrap_or_else(|| unreachable!("no live seat at the table"))
    }

    // === Bidding ===

    /// Place `quantity x face` for `user`.
    pub fn place_bid(&mut self, user: UserId, quantity: u32, face: u8) -> Result<(), ActionError> {
        let seat = self.acting_seat(user)?;
        let face = Face::new(face).ok_or(ActionError::InvalidFace(face))?;
        if quantity < 1 {
            return Err(ActionError::InvalidQuantity);
        }

        match &self.current_bid {
            None => rules::check_opening(face, self.palifico)?,
            Some(previous) => rules::check_raise(previous, quantity, face, self.palifico)?,
        }

        let bid = Bid::new(quantity, face, seat);
        let bidder = self.players[seat.index()].user().clone();
        self.current_bid = Some(bid);
        self.recent_bids.push_back(BidRecord {
            quantity,
            face,
            bidder: seat,
            bidder_name: bidder.name.clone(),
        });
        while self.recent_bids.len() > self.config.history_len {
            self.recent_bids.pop_front();
        }

        tracing::debug!(target: "perudo.engine", round = self.round, %seat, %bid, "bid placed");
        self.events.publish(&GameEvent::BidPlaced {
            seat,
            user: bidder,
            quantity,
            face,
        });

        self.turn = self.next_live_after(self.turn);
        let next = &self.players[self.turn];
        self.events.publish(&GameEvent::TurnAdvanced {
            seat: Seat::new(self.turn as u8),
            user: next.user().clone(),
        });
        Ok(())
    }

    // === Resolutions ===

    /// Dudo: call the standing bid a bluff.
    pub fn challenge(
        &mut self,
        user: UserId,
    ) -> Result<Resolved<ChallengeResolution>, ActionError> {
        let challenger = self.acting_seat(user)?;
        let bid = self.current_bid.ok_or(ActionError::NoBid)?;

        let actual_count = rules::count_matching(&self.players, bid.face, self.palifico);
        let success = rules::dudo_succeeds(actual_count, &bid);
        let loser = if success { bid.bidder } else { challenger };
        let revealed = rules::reveal(&self.players);

        {
            let tally = self.players[challenger.index()].tally_mut();
            if success {
                tally.bluffs_called_success += 1;
            } else {
                tally.bluffs_called_fail += 1;
            }
        }
        let challenger_id = self.players[challenger.index()].id();
        let loser_id = self.players[loser.index()].id();
        self.report("bluff", self.stats.record_bluff_outcome(challenger_id, success));
        self.report("round_loss", self.stats.record_round_loss(loser_id));

        let eliminated = self.players[loser.index()].lose_die();

        tracing::debug!(
            target: "perudo.engine",
            round = self.round,
            %challenger,
            %bid,
            actual_count,
            success,
            %loser,
            eliminated,
            "dudo resolved"
        );
        let resolution = ChallengeResolution {
            challenger,
            bidder: bid.bidder,
            bid,
            actual_count,
            success,
            loser,
            eliminated,
            revealed,
        };
        self.events.publish(&GameEvent::ChallengeResolved(resolution.clone()));

        let follow_up = self.close_round(loser, eliminated);
        Ok(Resolved {
            resolution,
            follow_up,
        })
    }

    /// Calza: call the standing bid exact.
    pub fn exact_call(
        &mut self,
        user: UserId,
    ) -> Result<Resolved<ExactCallResolution>, ActionError> {
        let caller = self.acting_seat(user)?;
        let bid = self.current_bid.ok_or(ActionError::NoBid)?;
        if !self.calza_permitted() {
            return Err(ActionError::CalzaForbiddenInPalifico);
        }

        let actual_count = rules::count_matching(&self.players, bid.face, self.palifico);
        let success = rules::calza_succeeds(actual_count, &bid);
        let revealed = rules::reveal(&self.players);
        let caller_id = self.players[caller.index()].id();

        let player = &mut self.players[caller.index()];
        let eliminated = if success {
            player.tally_mut().calzas_success += 1;
            player.gain_die();
            false
        } else {
            player.tally_mut().calzas_fail += 1;
            player.lose_die()
        };
        self.report("calza", self.stats.record_calza_outcome(caller_id, success));
        if !success {
            self.report("round_loss", self.stats.record_round_loss(caller_id));
        }

        tracing::debug!(
            target: "perudo.engine",
            round = self.round,
            %caller,
            %bid,
            actual_count,
            success,
            eliminated,
            "calza resolved"
        );
        let resolution = ExactCallResolution {
            caller,
            bid,
            actual_count,
            success,
            eliminated,
            revealed,
        };
        self.events.publish(&GameEvent::ExactCallResolved(resolution.clone()));

        let follow_up = self.close_round(caller, eliminated);
        Ok(Resolved {
            resolution,
            follow_up,
        })
    }

    /// After a resolution: end the game or pick the next opener.
    ///
    /// The anchor opens the next round unless they were just eliminated, in
    /// which case the next live seat after them does.
    fn close_round(&mut self, anchor: Seat, eliminated: bool) -> FollowUp {
        self.round_open = false;
        if self.live_count() <= 1 {
            self.end_game();
            return FollowUp::GameOver {
                winner: self.winner,
            };
        }
        self.turn = if eliminated {
            self.next_live_after(anchor.index())
        } else {
            anchor.index()
        };
        FollowUp::NextRound
    }

    fn end_game(&mut self) {
        self.phase = Phase::Finished;
        self.winner = self
            .players
            .iter()
            .position(|p| !p.is_eliminated())
            .map(|i| Seat::new(i as u8));

        let standings: Vec<Standing> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| Standing {
                seat: Seat::new(i as u8),
                user: p.user().clone(),
                winner: self.winner == Some(Seat::new(i as u8)),
                dice_left: p.die_count(),
                tally: *p.tally(),
            })
            .collect();

        for standing in &standings {
            self.report(
                "game_result",
                self.stats
                    .record_game_result(standing.user.id, &standing.user.name, standing.winner),
            );
        }

        tracing::info!(
            target: "perudo.engine",
            rounds = self.round,
            winner = ?self.winner,
            "game over"
        );
        self.events.publish(&GameEvent::GameEnded {
            winner: self.winner,
            standings,
        });
    }

    fn report(&self, what: &'static str, result: Result<(), StatsError>) {
        if let Err(error) = result {
            tracing::warn!(target: "perudo.stats", stat = what, %error, "stats sink failed");
        }
    }

    // === Dispatch ===

    /// Execute a command.
    pub fn apply(&mut self, command: Command) -> Result<ActionOutcome, ActionError> {
        match command {
            Command::Join(user) => self.add_player(user).map(ActionOutcome::Joined),
            Command::Start => self.start().map(|()| ActionOutcome::Started),
            Command::Bid {
                user,
                quantity,
                face,
            } => self
                .place_bid(user, quantity, face)
                .map(|()| ActionOutcome::BidPlaced),
            Command::Challenge { user } => self.challenge(user).map(ActionOutcome::Challenged),
            Command::ExactCall { user } => self.exact_call(user).map(ActionOutcome::ExactCalled),
        }
    }

    /// Replace a seat's hand. Test rigging only.
    #[doc(hidden)]
    pub fn rig_dice(&mut self, seat: Seat, dice: &[Face]) {
        self.players[seat.index()].set_dice(dice);
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("turn", &self.turn)
            .field("players", &self.players.len())
            .field("current_bid", &self.current_bid)
            .field("palifico", &self.palifico)
            .finish_non_exhaustive()
    }
}
