use super::*;

#[test]
fn editor_mode_from_numeric_param_is_edit() {
    assert_eq!(EditorMode::from_param(Some("12")), EditorMode::Edit(12));
    assert_eq!(EditorMode::from_param(Some(" 7 ")), EditorMode::Edit(7));
}

#[test]
fn editor_mode_without_usable_id_is_create() {
    for raw in [None, Some(""), Some("novo"), Some("0"), Some("-3"), Some("1.5")] {
        assert_eq!(EditorMode::from_param(raw), EditorMode::Create, "{raw:?}");
    }
}

#[test]
fn parse_flag_accepts_checkbox_and_bool_spellings() {
    assert!(parse_flag("true").unwrap());
    assert!(parse_flag("on").unwrap());
    assert!(!parse_flag("False").unwrap());
    assert!(!parse_flag("0").unwrap());
    assert!(matches!(parse_flag("talvez"), Err(EditorError::InvalidField("visibilidade"))));
}

#[test]
fn list_view_resolves_covers_and_clamps_total_pages() {
    let user = UserSnapshot {
        id: 1,
        name: "Bia".into(),
        email: "bia@escola.test".into(),
        role: crate::session::Role::Student,
        avatar: None,
    };
    let posts = vec![Post {
        id: 4,
        titulo: "T".into(),
        descricao: "D".into(),
        visibilidade: true,
        data_publicacao: None,
        caminho_imagem: Some("x.png".into()),
        autor_id: Some(2),
    }];
    let meta = PageMeta { total: 0, page: 1, limit: 6, total_pages: 0 };

    let view = ListView::new(user, posts, meta, None, "http://up.test");
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.posts[0].cover_url, "http://up.test/x.png");
}
