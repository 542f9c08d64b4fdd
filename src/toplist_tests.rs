// End-to-end scenarios over the whole aggregate -> score -> build pipeline

#[cfg(test)]
mod tests {
    use crate::error::ToplistError;
    use crate::loader::{ListeningWindow, MockPlayEventSource};
    use crate::models::PlayEvent;
    use crate::toplist::*;
    use crate::writer::MockPlaylistWriter;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use std::collections::HashMap;

    fn household_events() -> Vec<PlayEvent> {
        vec![
            PlayEvent::new("home", "anna", "t1", Some("rock"), 5),
            PlayEvent::new("home", "anna", "t2", Some("rock"), 1),
            PlayEvent::new("home", "anna", "t3", Some("jazz"), 3),
            PlayEvent::new("home", "anna", "t4", None, 1),
            PlayEvent::new("home", "ben", "t1", Some("rock"), 2),
            PlayEvent::new("home", "ben", "t5", Some("pop"), 2),
            PlayEvent::membership("home", "cleo"),
            PlayEvent::new("office", "ben", "t6", Some("pop"), 4),
            PlayEvent::new("office", "dan", "t6", Some("pop"), 1),
            PlayEvent::new("office", "dan", "t7", Some("jazz"), 3),
        ]
    }

    type ScoreTable = HashMap<(String, String), f64>;

    /// (group, track) -> score and (group, genre) -> score
    fn score_table(events: &[PlayEvent]) -> (ScoreTable, ScoreTable) {
        let mut tracks = HashMap::new();
        let mut genres = HashMap::new();
        for group in score(&aggregate(events)) {
            for track in &group.all_tracks {
                tracks.insert((group.id.clone(), track.id.clone()), track.score);
            }
            for genre in &group.genres {
                genres.insert((group.id.clone(), genre.name.clone()), genre.score);
            }
        }
        (tracks, genres)
    }

    fn window() -> ListeningWindow {
        ListeningWindow::trailing_days(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(), 7)
    }

    #[test]
    fn test_two_member_rock_scenario() {
        let events = vec![
            PlayEvent::new("G", "A", "T1", Some("rock"), 5),
            PlayEvent::new("G", "A", "T2", None, 5),
            PlayEvent::new("G", "B", "T1", Some("rock"), 2),
            PlayEvent::new("G", "B", "T3", None, 2),
        ];
        let playlists = ToplistGenerator::new(ToplistConfig::default())
            .generate(&events)
            .unwrap();

        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].name, "Top 10");
        assert_relative_eq!(playlists[0].tracks[0].score, 1.0);
        assert_eq!(playlists[1].name, "rock");
        assert_relative_eq!(playlists[1].score, 0.5);
    }

    #[test]
    fn test_member_total_is_sum_of_all_routed_plays() {
        let events = household_events();
        let groups = aggregate(&events);

        for (group_id, group) in groups.iter() {
            for (user, total) in group.members.iter() {
                let expected: u64 = events
                    .iter()
                    .filter(|e| e.group_id == group_id && e.user_id == user)
                    .map(|e| e.plays)
                    .sum();
                assert_eq!(*total, expected, "{group_id}/{user}");
            }
        }
        assert_eq!(groups.get("home").unwrap().members.get("anna"), Some(&10));
        assert_eq!(groups.get("home").unwrap().members.get("cleo"), Some(&0));
    }

    #[test]
    fn test_scores_do_not_depend_on_row_order() {
        let events = household_events();
        let (tracks, genres) = score_table(&events);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let mut shuffled = events.clone();
            shuffled.shuffle(&mut rng);
            let (shuffled_tracks, shuffled_genres) = score_table(&shuffled);

            assert_eq!(tracks.len(), shuffled_tracks.len());
            for (key, score) in &tracks {
                assert_relative_eq!(*score, shuffled_tracks[key], epsilon = 1e-12);
            }
            for (key, score) in &genres {
                assert_relative_eq!(*score, shuffled_genres[key], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_scores_are_scale_invariant() {
        let events = household_events();
        let scaled: Vec<PlayEvent> = events
            .iter()
            .map(|e| PlayEvent {
                plays: e.plays * 13,
                ..e.clone()
            })
            .collect();

        let (tracks, genres) = score_table(&events);
        let (scaled_tracks, scaled_genres) = score_table(&scaled);

        for (key, score) in &tracks {
            assert_relative_eq!(*score, scaled_tracks[key], epsilon = 1e-12);
        }
        for (key, score) in &genres {
            assert_relative_eq!(*score, scaled_genres[key], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_play_member_lowers_per_capita_genre_scores() {
        let (_, genres) = score_table(&household_events());

        // home has three members even though cleo never listened
        // rock: t1 = 5/10 + 2/4, t2 = 1/10
        assert_relative_eq!(genres[&("home".to_string(), "rock".to_string())], 1.1 / 3.0);
        // office pop: t6 = 4/4 + 1/4
        assert_relative_eq!(genres[&("office".to_string(), "pop".to_string())], 1.25 / 2.0);
    }

    #[test]
    fn test_generate_rejects_duplicate_rows() {
        let mut events = household_events();
        events.push(PlayEvent::new("home", "anna", "t1", Some("rock"), 1));

        let result = ToplistGenerator::new(ToplistConfig::default()).generate(&events);

        assert!(matches!(result, Err(ToplistError::DuplicatePlayEvent { .. })));
    }

    #[test]
    fn test_run_publishes_generated_playlists() {
        let mut source = MockPlayEventSource::new();
        source
            .expect_fetch_play_events()
            .times(1)
            .returning(|_| Ok(household_events()));

        let mut writer = MockPlaylistWriter::new();
        writer.expect_retire_current().times(1).returning(|| Ok(()));
        // home: Top 3, rock, jazz, pop. office: Top 3, pop, jazz
        writer.expect_insert().times(7).returning(|_| Ok(()));
        writer.expect_commit().times(1).returning(|| Ok(()));

        let config = ToplistConfig {
            top_overall_size: 3,
            ..ToplistConfig::default()
        };
        let generator = ToplistGenerator::new(config);
        assert_eq!(generator.config().top_overall_size, 3);
        let playlists = generator.run(&source, &mut writer, &window()).unwrap();

        let names: Vec<&str> = playlists.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Top 3", "rock", "jazz", "pop", "Top 3", "pop", "jazz"]);
        assert!(playlists.iter().all(|p| p.tracks.len() <= 3));
    }

    #[test]
    fn test_run_does_not_write_when_loading_fails() {
        let mut source = MockPlayEventSource::new();
        source
            .expect_fetch_play_events()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let mut writer = MockPlaylistWriter::new();
        writer.expect_retire_current().never();
        writer.expect_insert().never();
        writer.expect_commit().never();

        let result =
            ToplistGenerator::new(ToplistConfig::default()).run(&source, &mut writer, &window());

        assert!(result.is_err());
    }
}
