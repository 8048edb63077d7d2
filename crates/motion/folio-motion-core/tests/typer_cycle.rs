use folio_motion_core::{
    outputs::{Outputs, Property},
    typer::{Typer, TyperMode, TyperTiming},
    ElementId,
};

fn timing(jitter_ms: f64) -> TyperTiming {
    TyperTiming {
        type_delay_ms: 50.0,
        pause_ms: 1400.0,
        jitter_ms,
        next_phrase_ms: 200.0,
    }
}

/// Drive `typer` tick by tick, returning (phrase index, text) after each tick.
fn ticks(typer: &mut Typer, n: usize) -> Vec<(usize, String)> {
    let mut seen = Vec::with_capacity(n);
    let mut out = Outputs::default();
    typer.advance(0.0, &mut out);
    seen.push((typer.state().phrase, typer.text().to_string()));
    for _ in 1..n {
        let wait = typer.next_tick_in_ms();
        out.clear();
        typer.advance(wait, &mut out);
        assert_eq!(out.changes.len(), 1, "exactly one tick per wait");
        assert_eq!(out.changes[0].property, Property::Text);
        seen.push((typer.state().phrase, typer.text().to_string()));
    }
    seen
}

#[test]
fn text_is_always_a_prefix_of_the_current_phrase() {
    let lists: Vec<Vec<&str>> = vec![
        vec!["Analyst"],
        vec!["Analyst", "Engineer"],
        vec!["a", "", "Kỹ sư dữ liệu", "Engineer"],
        vec!["", ""],
    ];
    for list in lists {
        let phrases: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        let mut typer = Typer::start(ElementId(0), phrases.clone(), timing(60.0), 42).unwrap();
        for (idx, text) in ticks(&mut typer, 200) {
            assert!(
                phrases[idx].starts_with(&text),
                "{text:?} is not a prefix of {:?}",
                phrases[idx]
            );
        }
    }
}

#[test]
fn lengths_cycle_without_skipping() {
    let phrases = vec!["Analyst".to_string(), "Engineer".to_string()];
    let mut typer = Typer::start(ElementId(0), phrases.clone(), timing(60.0), 9).unwrap();
    let seen = ticks(&mut typer, 120);

    let mut prev: Option<(usize, usize)> = None;
    for (idx, text) in seen {
        let len = text.chars().count();
        if let Some((pidx, plen)) = prev {
            if idx == pidx {
                assert_eq!(
                    (len as i64 - plen as i64).abs(),
                    1,
                    "length jumped {plen} -> {len} within phrase {idx}"
                );
            } else {
                // the tick that clears the last character also selects the next phrase
                assert_eq!(plen, 1);
                assert_eq!(len, 0);
                assert_eq!(idx, (pidx + 1) % phrases.len());
            }
        }
        prev = Some((idx, len));
    }
}

#[test]
fn full_phrase_shows_before_any_deletion() {
    let phrases = vec!["Analyst".to_string(), "Engineer".to_string()];
    let mut typer = Typer::start(ElementId(0), phrases, timing(60.0), 3).unwrap();
    let texts: Vec<String> = ticks(&mut typer, 14).into_iter().map(|(_, t)| t).collect();
    let full = texts.iter().position(|t| t == "Analyst").expect("typed in full");
    assert_eq!(full, 6);
    assert_eq!(texts[full + 1], "Analys");
    for w in texts[..=full].windows(2) {
        assert!(w[1].len() > w[0].len(), "deleted before finishing: {w:?}");
    }
}

#[test]
fn one_phrase_loops_forever() {
    let mut typer = Typer::start(ElementId(0), vec!["ab".into()], timing(0.0), 1).unwrap();
    let texts: Vec<String> = ticks(&mut typer, 9).into_iter().map(|(_, t)| t).collect();
    // a, ab, a, "", a, ab, a, "", a
    assert_eq!(texts, vec!["a", "ab", "a", "", "a", "ab", "a", "", "a"]);
    assert_eq!(typer.state().mode, TyperMode::Typing);
}

#[test]
fn waits_follow_the_phase() {
    let mut typer = Typer::start(ElementId(0), vec!["ab".into()], timing(0.0), 1).unwrap();
    let mut out = Outputs::default();
    let mut waits = Vec::new();
    typer.advance(0.0, &mut out);
    for _ in 0..4 {
        let w = typer.next_tick_in_ms();
        waits.push(w);
        typer.advance(w, &mut out);
    }
    // after "a": keystroke; after "ab": hold; after "a": backspace; after "": next phrase
    assert_eq!(waits, vec![50.0, 1400.0, 25.0, 200.0]);
}

#[test]
fn one_large_step_runs_ticks_in_order() {
    let mut typer = Typer::start(ElementId(1), vec!["abc".into()], timing(0.0), 1).unwrap();
    let mut out = Outputs::default();
    typer.advance(120.0, &mut out);
    let texts: Vec<&str> = out.changes.iter().map(|c| c.value.as_str()).collect();
    // t=0 "a", t=50 "ab", t=100 "abc"
    assert_eq!(texts, vec!["a", "ab", "abc"]);
    assert_eq!(typer.next_tick_in_ms(), 1380.0);
}
