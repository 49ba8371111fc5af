//! Click race: first participant to click the configured target wins.
//!
//! The smallest useful Quorum game — one inbound event, a progress
//! broadcast, and a win condition that ends the session.

use std::collections::HashMap;

use quorum::prelude::*;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Game logic
// ---------------------------------------------------------------------------

struct ClickRace {
    ctx: GameContext,
    players: Vec<Player>,
    clicks: HashMap<PlayerId, u64>,
    target: u64,
}

impl ClickRace {
    fn name_of(&self, id: PlayerId) -> &str {
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or("?")
    }
}

impl GameLogic for ClickRace {
    fn events(&self) -> Vec<String> {
        vec!["click".into()]
    }

    fn start_game(&mut self) {
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        self.ctx.broadcast(
            "started",
            json!({ "players": names, "target": self.target }),
        );
    }

    fn handle_event(&mut self, _event: &str, sender: PlayerId, _data: Value) {
        let clicks = self.clicks.entry(sender).or_insert(0);
        *clicks += 1;
        let clicks = *clicks;

        self.ctx.broadcast(
            "progress",
            json!({ "player": self.name_of(sender), "clicks": clicks }),
        );

        if clicks >= self.target {
            self.ctx
                .broadcast("finished", json!({ "winner": self.name_of(sender) }));
            self.ctx.end_session();
        }
    }
}

struct ClickRaceFactory;

impl GameLogicFactory for ClickRaceFactory {
    type Logic = ClickRace;

    fn build(
        &self,
        ctx: GameContext,
        players: Vec<Player>,
        settings: Value,
    ) -> Result<ClickRace, String> {
        let target = settings["target"].as_u64().unwrap_or(10);
        if target == 0 {
            return Err("target must be at least 1".into());
        }
        Ok(ClickRace {
            ctx,
            players,
            clicks: HashMap::new(),
            target,
        })
    }
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), LobbyError> {
    init_logging("info");

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let server = LobbyServerBuilder::new()
        .bind(&format!("0.0.0.0:{port}"))
        .room_config(RoomConfig {
            settings: json!({ "target": 10 }),
            ..RoomConfig::default()
        })
        .build(ClickRaceFactory)
        .await?;

    server.run().await
}

// ---------------------------------------------------------------------------
// Tests — drive the game through a room actor.
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_room::{spawn_room, Outbound, RoomHandle};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn config(target: u64) -> RoomConfig {
        RoomConfig {
            capacity: 2,
            names: vec!["Max".into(), "Moritz".into()],
            settings: json!({ "target": target }),
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> (Vec<Envelope>, bool) {
        let mut events = Vec::new();
        let mut closed = false;
        while let Ok(out) = rx.try_recv() {
            match out {
                Outbound::Event(env) => events.push(env),
                Outbound::Close => closed = true,
            }
        }
        (events, closed)
    }

    async fn start_race(
        target: u64,
    ) -> (RoomHandle, Vec<mpsc::UnboundedReceiver<Outbound>>) {
        let room = spawn_room(config(target), ClickRaceFactory);
        let mut receivers = Vec::new();
        for id in 1..=2 {
            let (tx, rx) = mpsc::unbounded_channel();
            room.join(PlayerId(id), tx).await.expect("join should succeed");
            receivers.push(rx);
        }
        settle().await;
        for rx in &mut receivers {
            let _ = drain(rx);
        }
        (room, receivers)
    }

    #[tokio::test]
    async fn test_click_broadcasts_progress() {
        let (room, mut receivers) = start_race(3).await;

        room.deliver(PlayerId(1), Envelope::new("click", json!(null)));
        settle().await;

        for rx in &mut receivers {
            let (events, _) = drain(rx);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].event, "progress");
            assert_eq!(events[0].data["clicks"], 1);
        }
    }

    #[tokio::test]
    async fn test_first_to_target_wins_and_session_ends() {
        let (room, mut receivers) = start_race(2).await;

        // One click each, then the winning second click from player 1.
        room.deliver(PlayerId(1), Envelope::new("click", json!(null)));
        room.deliver(PlayerId(2), Envelope::new("click", json!(null)));
        room.deliver(PlayerId(1), Envelope::new("click", json!(null)));
        settle().await;

        let (events, closed) = drain(&mut receivers[1]);
        let finished = events.iter().find(|e| e.event == "finished").unwrap();
        assert!(["Max", "Moritz"].contains(&finished.data["winner"].as_str().unwrap()));
        assert!(closed, "session end severs every channel");

        let info = room.info().await.unwrap();
        assert_eq!(info.phase, Phase::Lobby);
        assert_eq!(info.player_count, 0);
    }

    #[tokio::test]
    async fn test_counts_are_tracked_per_player() {
        let (room, mut receivers) = start_race(5).await;

        room.deliver(PlayerId(1), Envelope::new("click", json!(null)));
        room.deliver(PlayerId(1), Envelope::new("click", json!(null)));
        room.deliver(PlayerId(2), Envelope::new("click", json!(null)));
        settle().await;

        let (events, _) = drain(&mut receivers[0]);
        let counts: Vec<u64> = events
            .iter()
            .map(|e| e.data["clicks"].as_u64().unwrap())
            .collect();
        // Player 1 reaches 2; player 2 is back at 1.
        assert_eq!(counts, vec![1, 2, 1]);
    }

    #[tokio::test]
    async fn test_zero_target_fails_the_bind() {
        let room = spawn_room(config(0), ClickRaceFactory);
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        room.join(PlayerId(1), tx1).await.unwrap();
        room.join(PlayerId(2), tx2).await.unwrap();
        settle().await;

        // The bind failed, so the room fell back to an empty lobby.
        let info = room.info().await.unwrap();
        assert_eq!(info.phase, Phase::Lobby);
        assert_eq!(info.player_count, 0);
        let (_, closed) = drain(&mut rx1);
        assert!(closed);
    }
}
