#[cfg(test)]
mod tests {
    use crate::battle::engine::resolve_turn;
    use crate::battle::state::{BattleEvent, LoggedEvent, Side, StatusChange, TurnRng};
    use crate::battle::tests::common::{assert_ok, create_test_battle, predictable_rng, TestCombatantBuilder};
    use crate::config::{EngineConfig, PpPolicy};
    use crate::pokemon::StatusCondition;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusType;

    fn residual_damage(events: &[LoggedEvent], target: &str) -> Vec<u16> {
        events
            .iter()
            .filter_map(|e| match &e.event {
                BattleEvent::StatusChange {
                    target: t,
                    change: StatusChange::Damaged,
                    damage,
                    ..
                } if t == target => Some(*damage),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frozen_combatant_skips_its_move() {
        // Arrange
        let player = TestCombatantBuilder::new("pikachu")
            .with_moves(&["thunderbolt"])
            .with_status(StatusType::Freeze)
            .with_speed(150)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["tackle"])
            .with_speed(10)
            .build();
        let opponent_hp = opponent.current_hp;
        let mut battle_state = create_test_battle(player, opponent);
        // 50 misses the 20% thaw roll.
        let mut rng = predictable_rng();

        // Act
        let bus = assert_ok(resolve_turn(
            &mut battle_state,
            "thunderbolt",
            "tackle",
            &EngineConfig::default(),
            &mut rng,
        ));

        // Assert
        assert_eq!(battle_state.opponent.current_hp, opponent_hp);
        assert_eq!(battle_state.player.status_type(), Some(StatusType::Freeze));
        let skipped = bus
            .events()
            .iter()
            .find(|e| e.side == Side::Player && matches!(e.event, BattleEvent::Move { .. }))
            .expect("frozen side still reports its move");
        match &skipped.event {
            BattleEvent::Move { damage, message, .. } => {
                assert_eq!(*damage, 0);
                assert_eq!(message, "Pikachu is frozen solid!");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_frozen_combatant_can_thaw_and_act() {
        let player = TestCombatantBuilder::new("pikachu")
            .with_moves(&["thunderbolt"])
            .with_status(StatusType::Freeze)
            .with_speed(150)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["tackle"])
            .with_speed(10)
            .build();
        let opponent_hp = opponent.current_hp;
        let mut battle_state = create_test_battle(player, opponent);
        let mut rolls = vec![10];
        rolls.extend(vec![50; 20]);
        let mut rng = TurnRng::new_for_test(rolls);

        let bus = assert_ok(resolve_turn(
            &mut battle_state,
            "thunderbolt",
            "tackle",
            &EngineConfig::default(),
            &mut rng,
        ));

        assert_eq!(battle_state.player.status, None);
        assert!(battle_state.opponent.current_hp < opponent_hp);
        assert!(bus
            .events()
            .iter()
            .any(|e| e.event.message() == "Pikachu thawed out!"));
    }

    #[rstest]
    #[case(PpPolicy::SpendBeforeStatusCheck, 34)]
    #[case(PpPolicy::SpendOnExecution, 35)]
    fn test_full_paralysis_and_pp_policy(#[case] pp_policy: PpPolicy, #[case] expected_pp: u8) {
        let player = TestCombatantBuilder::new("pikachu")
            .with_moves(&["tackle"])
            .with_status(StatusType::Paralysis)
            .with_speed(200)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["tackle"])
            .with_speed(30)
            .build();
        let opponent_hp = opponent.current_hp;
        let mut battle_state = create_test_battle(player, opponent);
        let config = EngineConfig {
            pp_policy,
            ..EngineConfig::default()
        };
        // 10 lands inside the 25% full-paralysis chance.
        let mut rolls = vec![10];
        rolls.extend(vec![50; 10]);
        let mut rng = TurnRng::new_for_test(rolls);

        let bus = assert_ok(resolve_turn(&mut battle_state, "tackle", "tackle", &config, &mut rng));

        assert_eq!(battle_state.opponent.current_hp, opponent_hp);
        assert_eq!(battle_state.player.moves[0].pp, expected_pp);
        assert_eq!(battle_state.opponent.moves[0].pp, 34);
        assert!(bus
            .events()
            .iter()
            .any(|e| e.event.message() == "Pikachu is paralyzed! It can't move!"));
    }

    #[test]
    fn test_paralysis_halves_speed_for_ordering() {
        let player = TestCombatantBuilder::new("pikachu")
            .with_moves(&["tackle"])
            .with_status(StatusType::Paralysis)
            .with_speed(100)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["tackle"])
            .with_speed(60)
            .build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut rng = predictable_rng();

        let bus = assert_ok(resolve_turn(
            &mut battle_state,
            "tackle",
            "tackle",
            &EngineConfig::default(),
            &mut rng,
        ));

        assert_eq!(bus.events()[0].side, Side::Opponent);
        assert_eq!(bus.events()[0].event.message(), "Snorlax is faster (60 vs 50).");
    }

    #[test]
    fn test_sleep_counts_down_then_wakes() {
        let player = TestCombatantBuilder::new("pikachu")
            .with_moves(&["tackle"])
            .with_status_condition(StatusCondition::sleeping(2))
            .with_speed(150)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["recover"])
            .with_speed(10)
            .build();
        let opponent_hp = opponent.current_hp;
        let mut battle_state = create_test_battle(player, opponent);
        let config = EngineConfig::default();
        let mut rng = predictable_rng();

        let first = assert_ok(resolve_turn(&mut battle_state, "tackle", "recover", &config, &mut rng));
        assert!(first.events().iter().any(|e| e.event.message() == "Pikachu is fast asleep."));
        assert_eq!(battle_state.opponent.current_hp, opponent_hp);
        assert_eq!(
            battle_state.player.status,
            Some(StatusCondition {
                kind: StatusType::Sleep,
                duration: Some(1),
                counter: 1,
            })
        );

        let second = assert_ok(resolve_turn(&mut battle_state, "tackle", "recover", &config, &mut rng));
        assert!(second.events().iter().any(|e| e.event.message() == "Pikachu woke up!"));
        assert_eq!(battle_state.player.status, None);
        assert!(second.events().iter().any(|e| matches!(
            &e.event,
            BattleEvent::Move { attacker, damage, .. } if attacker == "Pikachu" && *damage > 0
        )));
    }

    #[test]
    fn test_sleep_inducing_move_rolls_duration() {
        let player = TestCombatantBuilder::new("breloom")
            .with_moves(&["spore"])
            .with_speed(150)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["tackle"])
            .with_speed(10)
            .build();
        let mut battle_state = create_test_battle(player, opponent);
        // Spore never misses; the only roll before the opponent is the
        // duration. A roll of 3 counts down to 2 on the opponent's turn.
        let mut rng = TurnRng::new_for_test(vec![100]);

        let bus = assert_ok(resolve_turn(
            &mut battle_state,
            "spore",
            "tackle",
            &EngineConfig::default(),
            &mut rng,
        ));

        assert_eq!(
            battle_state.opponent.status,
            Some(StatusCondition {
                kind: StatusType::Sleep,
                duration: Some(2),
                counter: 1,
            })
        );
        assert!(bus.events().iter().any(|e| e.event.message() == "Snorlax fell asleep!"));
        assert!(bus.events().iter().any(|e| e.event.message() == "Snorlax is fast asleep."));
    }

    #[test]
    fn test_minimum_sleep_roll_skips_no_turns() {
        let player = TestCombatantBuilder::new("breloom")
            .with_moves(&["spore"])
            .with_speed(150)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["tackle"])
            .with_speed(10)
            .build();
        let mut battle_state = create_test_battle(player, opponent);
        // Duration 1, then Snorlax's tackle: crit and variance.
        let mut rng = TurnRng::new_for_test(vec![1, 50, 50]);

        let bus = assert_ok(resolve_turn(
            &mut battle_state,
            "spore",
            "tackle",
            &EngineConfig::default(),
            &mut rng,
        ));

        assert_eq!(battle_state.opponent.status, None);
        assert!(bus.events().iter().any(|e| e.event.message() == "Snorlax fell asleep!"));
        assert!(bus.events().iter().any(|e| e.event.message() == "Snorlax woke up!"));
        assert!(!bus.events().iter().any(|e| e.event.message() == "Snorlax is fast asleep."));
        assert!(bus.events().iter().any(|e| matches!(
            &e.event,
            BattleEvent::Move { attacker, damage, .. } if attacker == "Snorlax" && *damage > 0
        )));
    }

    #[test]
    fn test_toxic_damage_grows_every_turn() {
        // Arrange
        let player = TestCombatantBuilder::new("snorlax")
            .with_moves(&["toxic"])
            .with_status(StatusType::Toxic)
            .with_speed(80)
            .build();
        let opponent = TestCombatantBuilder::new("lapras")
            .with_moves(&["toxic"])
            .with_status(StatusType::Poison)
            .with_speed(40)
            .build();
        let mut battle_state = create_test_battle(player, opponent);
        let config = EngineConfig::default();
        let mut rng = predictable_rng();

        // Act
        let mut ticks = Vec::new();
        for _ in 0..3 {
            let bus = assert_ok(resolve_turn(&mut battle_state, "toxic", "toxic", &config, &mut rng));
            ticks.extend(residual_damage(bus.events(), "Snorlax"));
        }

        // Assert
        assert_eq!(ticks.len(), 3);
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]), "ticks {:?}", ticks);
        let max_hp = battle_state.player.max_hp;
        assert_eq!(ticks, vec![max_hp / 16, max_hp * 2 / 16, max_hp * 3 / 16]);
        assert_eq!(battle_state.player.status.map(|s| s.counter), Some(3));
    }

    #[test]
    fn test_poison_leaves_one_hp() {
        let player = TestCombatantBuilder::new("pikachu")
            .with_moves(&["thunder-wave"])
            .with_status(StatusType::Poison)
            .with_hp(3)
            .with_speed(150)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["recover"])
            .with_status(StatusType::Burn)
            .with_speed(10)
            .build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut rng = predictable_rng();

        let bus = assert_ok(resolve_turn(
            &mut battle_state,
            "thunder-wave",
            "recover",
            &EngineConfig::default(),
            &mut rng,
        ));

        assert_eq!(battle_state.player.current_hp, 1);
        assert!(!battle_state.is_game_over());
        assert_eq!(residual_damage(bus.events(), "Pikachu"), vec![2]);
    }

    #[test]
    fn test_burn_can_faint_at_end_of_turn() {
        let player = TestCombatantBuilder::new("pikachu")
            .with_moves(&["thunder-wave"])
            .with_status(StatusType::Burn)
            .with_hp(1)
            .with_speed(150)
            .build();
        let opponent = TestCombatantBuilder::new("snorlax")
            .with_moves(&["recover"])
            .with_status(StatusType::Poison)
            .with_speed(10)
            .build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut rng = predictable_rng();

        let bus = assert_ok(resolve_turn(
            &mut battle_state,
            "thunder-wave",
            "recover",
            &EngineConfig::default(),
            &mut rng,
        ));

        assert!(battle_state.player.is_fainted());
        assert_eq!(battle_state.winner, Some(Side::Opponent));
        // The opponent's residual never runs once the battle is decided.
        assert!(residual_damage(bus.events(), "Snorlax").is_empty());
        assert!(bus.events().last().map(|e| e.event.is_faint()).unwrap_or(false));
    }

    #[test]
    fn test_burn_weakens_physical_attacks() {
        let build = |status: Option<StatusType>| {
            let mut builder = TestCombatantBuilder::new("machamp")
                .with_moves(&["close-combat"])
                .with_speed(150);
            if let Some(status) = status {
                builder = builder.with_status(status);
            }
            let player = builder.build();
            let opponent = TestCombatantBuilder::new("snorlax")
                .with_moves(&["recover"])
                .with_speed(10)
                .build();
            let mut battle_state = create_test_battle(player, opponent);
            let mut rng = predictable_rng();
            let bus = assert_ok(resolve_turn(
                &mut battle_state,
                "close-combat",
                "recover",
                &EngineConfig::default(),
                &mut rng,
            ));
            bus.events()
                .iter()
                .find_map(|e| match &e.event {
                    BattleEvent::Move { attacker, damage, .. } if attacker == "Machamp" => Some(*damage),
                    _ => None,
                })
                .expect("machamp attacked")
        };

        let healthy = build(None);
        let burned = build(Some(StatusType::Burn));
        assert!(burned < healthy, "burned {} vs healthy {}", burned, healthy);
    }
}
