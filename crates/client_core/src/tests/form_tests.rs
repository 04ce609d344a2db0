use super::*;

fn wake_county() -> ClientOption {
    ClientOption::new("3", "WakeUP Wake County")
}

fn complete_state() -> SelectionState {
    let mut state = SelectionState::default();
    state.set_content("<p>Ad copy</p>");
    state.toggle_market(Market::Austin);
    state.set_client(wake_county());
    state.set_date("2026-06-01").expect("date");
    state
}

#[test]
fn toggling_a_market_twice_restores_membership() {
    let mut state = SelectionState::default();
    state.toggle_market(Market::Boston);
    let before = state.clone();

    assert!(state.toggle_market(Market::Seattle));
    assert!(!state.toggle_market(Market::Seattle));
    assert_eq!(state, before);
    assert!(state.is_market_selected(Market::Boston));
    assert!(!state.is_market_selected(Market::Seattle));
}

#[test]
fn selected_markets_come_back_in_catalog_order() {
    let mut state = SelectionState::default();
    state.toggle_market(Market::Orlando);
    state.toggle_market(Market::Greenville);
    state.toggle_market(Market::Madison);
    assert_eq!(
        state.selected_markets(),
        vec![Market::Greenville, Market::Madison, Market::Orlando]
    );
    assert_eq!(state.selected_count(), 3);
}

#[test]
fn placeholder_paragraphs_do_not_count_as_content() {
    for markup in ["", "   ", "<p></p>", "<p><br></p>", "<p> <br/> </p>", "<p><br></p><p></p>"] {
        assert!(!has_meaningful_content(markup), "{markup:?}");
    }
    for markup in ["<p>Hi</p>", "<p><br></p><p>Hi</p>", "<p><strong> </strong></p>"] {
        assert!(has_meaningful_content(markup), "{markup:?}");
    }
}

#[test]
fn validity_requires_all_four_conditions() {
    assert!(complete_state().is_valid());

    let mut no_content = complete_state();
    no_content.set_content("<p><br></p>");
    assert_eq!(
        no_content.validity(),
        Validity {
            has_content: false,
            has_markets: true,
            has_client: true,
            has_date: true,
        }
    );
    assert!(!no_content.is_valid());

    let mut no_markets = complete_state();
    no_markets.toggle_market(Market::Austin);
    assert!(!no_markets.is_valid());

    let mut no_client = complete_state();
    no_client.clear_client();
    assert!(!no_client.is_valid());

    let mut no_date = complete_state();
    no_date.set_date("").expect("clear");
    assert!(!no_date.is_valid());
}

#[test]
fn fields_can_be_filled_in_any_order() {
    let mut state = SelectionState::default();
    state.set_date("2026-01-02").expect("date");
    assert!(!state.is_valid());
    state.set_client(wake_county());
    assert!(!state.is_valid());
    state.toggle_market(Market::Dallas);
    assert!(!state.is_valid());
    state.set_content("<p>Go</p>");
    assert!(state.is_valid());
}

#[test]
fn validity_tracks_edits_without_caching() {
    let mut state = complete_state();
    assert!(state.is_valid());
    state.set_content("");
    assert!(!state.is_valid());
    state.set_content("<p>back</p>");
    assert!(state.is_valid());
}

#[test]
fn selecting_a_client_mirrors_its_name_into_the_query() {
    let mut state = SelectionState::default();
    state.set_client_query("wak");
    state.set_client(wake_county());
    assert_eq!(state.client_query(), "WakeUP Wake County");
    assert_eq!(state.selected_client(), Some(&wake_county()));

    state.clear_client();
    assert!(state.selected_client().is_none());
    assert_eq!(state.client_query(), "WakeUP Wake County");
}

#[test]
fn set_date_accepts_iso_and_rejects_other_formats() {
    let mut state = SelectionState::default();
    state.set_date("1999-12-31").expect("far past is accepted");
    assert_eq!(state.date(), NaiveDate::from_ymd_opt(1999, 12, 31));

    let err = state.set_date("12/31/1999").expect_err("not iso");
    assert!(matches!(err, IntakeError::InvalidDate(raw) if raw == "12/31/1999"));
    assert_eq!(state.date(), NaiveDate::from_ymd_opt(1999, 12, 31));
}

#[test]
fn build_payload_only_when_valid() {
    let mut state = complete_state();
    state.toggle_market(Market::Greenville);
    let payload = state.build_payload().expect("payload");
    assert_eq!(payload.html, "<p>Ad copy</p>");
    assert_eq!(payload.markets, vec![Market::Greenville, Market::Austin]);
    assert_eq!(payload.client, wake_county());
    assert_eq!(payload.date, NaiveDate::from_ymd_opt(2026, 6, 1).expect("date"));

    state.clear_client();
    assert!(state.build_payload().is_none());
}

#[test]
fn link_command_follows_link_url() {
    let mut state = SelectionState::default();
    assert_eq!(state.link_command().expect("unset"), FormattingCommand::UnsetLink);

    state.set_link_url("https://wakeup.org/events");
    assert_eq!(
        state.link_command().expect("set"),
        FormattingCommand::SetLink {
            href: "https://wakeup.org/events".into()
        }
    );

    state.set_link_url("mailto:ads@example.com");
    assert!(state.link_command().is_ok());

    state.set_link_url("javascript:alert(1)");
    assert!(matches!(
        state.link_command(),
        Err(IntakeError::InvalidLink { .. })
    ));

    state.set_link_url("not a url");
    assert!(state.link_command().is_err());
}

#[test]
fn reset_returns_to_initial_value() {
    let mut state = complete_state();
    state.set_link_url("https://example.com");
    state.reset();
    assert_eq!(state, SelectionState::default());
}
