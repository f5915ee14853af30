use super::*;
use crate::assist::AssistError;
use crate::auth::{AuthError, Session};
use crate::constants::{DRAFT_KEY, TEMPLATES_KEY, USER_KEY};
use crate::settings::{Settings, SupabaseSettings};
use crate::store::local::MemoryStorage;
use crate::store::{StoreError, TemplateLibrary};
use crate::types::{AppUser, AuthProvider, LabelConfig, NutritionItem, SavedTemplate};
use crate::validation::EditorTab;
use eframe::egui;
use eframe::Storage;
use std::time::Duration;

/// Run a single headless egui frame with the provided input events and closure.
fn run_ui_with(events: Vec<egui::Event>, mut f: impl FnMut(&egui::Context)) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.events = events;

    let ctx = egui::Context::default();
    ctx.run(raw, |ctx| {
        f(ctx);
    })
}

fn user() -> AppUser {
    AppUser {
        id: "u-42".into(),
        email: "bia@padaria.com".into(),
        name: "Bia".into(),
        avatar_url: String::new(),
        provider: AuthProvider::Github,
    }
}

fn template(name: &str, product: &str) -> SavedTemplate {
    let config = LabelConfig {
        product_name: product.into(),
        ..LabelConfig::default()
    };
    SavedTemplate::snapshot(name, &config)
}

#[test]
fn every_tab_renders_without_panicking() {
    let mut app = LabelDesignerApp::default();
    app.library.insert_newest(template("Pão", "PÃO DE MEL"));

    for tab in EditorTab::ALL {
        app.active_tab = tab;
        let _ = run_ui_with(vec![], |ctx| app.show(ctx));
    }
}

#[test]
fn dark_busy_and_blocked_frames_render() {
    let mut app = LabelDesignerApp::default();
    app.prefs.dark_mode = true;
    app.busy = true;
    app.config.width = 15.0;
    app.config.product_name.clear();
    app.notification = Some("Aviso de teste".into());
    app.sync.db_error = Some(DbError {
        message: "Tabela \"templates\" não encontrada.".into(),
        table_missing: true,
    });
    app.active_tab = EditorTab::Templates;

    let _ = run_ui_with(vec![], |ctx| app.show(ctx));
    assert!(app.busy);
    assert_eq!(app.notification.as_deref(), Some("Aviso de teste"));
}

#[test]
fn signed_in_user_and_open_dialogs_render() {
    let mut app = LabelDesignerApp::default();
    app.account.user = Some(user());
    app.account.show_login = true;
    let id = {
        let saved = template("Bolo", "BOLO");
        let id = saved.id;
        app.library.insert_newest(saved);
        id
    };
    app.pending_confirm = Some(PendingConfirm::LoadTemplate(id));

    let _ = run_ui_with(vec![], |ctx| app.show(ctx));
    assert_eq!(app.pending_confirm, Some(PendingConfirm::LoadTemplate(id)));
}

#[test]
fn persist_writes_only_what_changed() {
    let mut app = LabelDesignerApp::default();
    let mut storage = MemoryStorage::default();

    app.persist_changes(&mut storage);
    assert!(storage.values.contains_key(DRAFT_KEY));
    assert!(storage.values.contains_key(TEMPLATES_KEY));

    // Nothing changed, so nothing is rewritten
    storage.values.clear();
    app.persist_changes(&mut storage);
    assert!(storage.values.is_empty());

    app.config.product_name = "GRANOLA".into();
    app.persist_changes(&mut storage);
    assert!(storage.values.contains_key(DRAFT_KEY));
    assert!(!storage.values.contains_key(TEMPLATES_KEY));

    app.account.user = Some(user());
    app.persist_changes(&mut storage);
    assert!(storage.get_string(USER_KEY).is_some_and(|json| json.contains("u-42")));
}

#[test]
fn restore_loads_what_was_persisted() {
    let mut storage = MemoryStorage::default();
    let mut first = LabelDesignerApp::default();
    first.config.product_name = "DOCE DE LEITE".into();
    first.library.insert_newest(template("Doce", "DOCE DE LEITE"));
    first.account.user = Some(user());
    first.prefs.dark_mode = true;
    first.persist_changes(&mut storage);
    eframe::App::save(&mut first, &mut storage);

    let mut second = LabelDesignerApp::default();
    second.restore(&storage);
    assert_eq!(second.config.product_name, "DOCE DE LEITE");
    assert_eq!(second.library.len(), 1);
    assert_eq!(second.account.user, Some(user()));
    assert!(second.prefs.dark_mode);

    // A fresh restore is already in sync with storage
    storage.values.clear();
    second.persist_changes(&mut storage);
    assert!(storage.values.is_empty());
}

#[test]
fn ui_prefs_fill_missing_fields_with_defaults() {
    let prefs = UiPrefs::from_json(r#"{"dark_mode":true}"#).unwrap();
    assert!(prefs.dark_mode);
    assert_eq!(prefs.editor_panel_width, UiPrefs::default().editor_panel_width);

    let json = prefs.to_json().unwrap();
    assert_eq!(UiPrefs::from_json(&json).unwrap(), prefs);
}

#[test]
fn offline_save_puts_the_template_first_and_clears_the_name() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();
    app.library.insert_newest(template("Antigo", "ANTIGO"));
    app.config.product_name = "BROWNIE".into();

    app.new_template_name = "   ".into();
    app.save_template(&ctx);
    assert_eq!(app.library.len(), 1);

    app.new_template_name = "  Brownie  ".into();
    app.save_template(&ctx);
    assert_eq!(app.library.len(), 2);
    let newest = &app.library.templates()[0];
    assert_eq!(newest.name, "Brownie");
    assert_eq!(newest.config.product_name, "BROWNIE");
    assert!(app.new_template_name.is_empty());
}

#[test]
fn confirmed_delete_removes_the_template_offline() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();
    let saved = template("Pudim", "PUDIM");
    let id = saved.id;
    app.library.insert_newest(saved);

    app.pending_confirm = Some(PendingConfirm::DeleteTemplate(id));
    assert_eq!(
        app.pending_confirm_message().as_deref(),
        Some("Excluir este modelo permanentemente?")
    );
    app.confirm_pending(&ctx);

    assert!(app.library.is_empty());
    assert_eq!(app.pending_confirm, None);
}

#[test]
fn confirmed_load_replaces_the_working_config() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();
    let saved = template("Cookies", "COOKIES");
    let id = saved.id;
    app.library.insert_newest(saved);

    app.pending_confirm = Some(PendingConfirm::LoadTemplate(id));
    assert_eq!(
        app.pending_confirm_message().as_deref(),
        Some("Deseja carregar o modelo \"Cookies\"?")
    );
    app.confirm_pending(&ctx);

    assert_eq!(app.config.product_name, "COOKIES");
    assert!(!app.load_template(uuid::Uuid::new_v4()));
}

#[test]
fn fetch_results_update_library_or_banner() {
    let mut app = LabelDesignerApp::default();
    app.sync.start();

    app.apply_task_result(TaskResult::TemplatesFetched(Ok(vec![
        template("A", "A"),
        template("B", "B"),
    ])));
    assert!(!app.sync.syncing());
    assert_eq!(app.library.len(), 2);
    assert_eq!(app.sync.db_error, None);

    app.apply_task_result(TaskResult::TemplatesFetched(Err(StoreError::TableMissing)));
    let banner = app.sync.db_error.clone().expect("banner should be set");
    assert!(banner.table_missing);
    // The mirror survives a failed fetch
    assert_eq!(app.library.len(), 2);
}

#[test]
fn failed_remote_save_leaves_the_library_alone() {
    let mut app = LabelDesignerApp::default();
    app.new_template_name = "Torta".into();
    let before = app.library.clone();

    app.apply_task_result(TaskResult::TemplateSaved {
        template: template("Torta", "TORTA"),
        result: Err(StoreError::Api {
            status: 500,
            message: "boom".into(),
        }),
    });

    assert_eq!(app.library, before);
    assert_eq!(app.new_template_name, "Torta");
    let banner = app.sync.db_error.clone().expect("banner should be set");
    assert!(!banner.table_missing);
    assert_eq!(banner.message, "boom");
}

#[test]
fn failed_remote_delete_notifies_and_keeps_the_row() {
    let mut app = LabelDesignerApp::default();
    let saved = template("Quiche", "QUICHE");
    let id = saved.id;
    app.library.insert_newest(saved);

    app.apply_task_result(TaskResult::TemplateDeleted {
        id,
        result: Err(StoreError::Api {
            status: 401,
            message: "denied".into(),
        }),
    });
    assert_eq!(app.library.len(), 1);
    assert_eq!(app.notification.as_deref(), Some("Erro ao excluir modelo: denied"));

    app.apply_task_result(TaskResult::TemplateDeleted { id, result: Ok(()) });
    assert!(app.library.is_empty());
}

#[test]
fn assist_results_replace_text_only_on_success() {
    let mut app = LabelDesignerApp::default();
    app.config.ingredients = "farinha, ovos".into();
    app.busy = true;

    app.apply_task_result(TaskResult::TextImproved {
        field: AssistField::Ingredients,
        result: Err(AssistError::Api {
            status: 429,
            message: "quota".into(),
        }),
    });
    assert!(!app.busy);
    assert_eq!(app.config.ingredients, "farinha, ovos");
    assert_eq!(app.notification, None);

    app.apply_task_result(TaskResult::TextImproved {
        field: AssistField::Preparation,
        result: Ok("Servir gelado.".into()),
    });
    assert_eq!(app.config.preparation, "Servir gelado.");
}

#[test]
fn nutrition_proposal_replaces_the_table() {
    let mut app = LabelDesignerApp::default();
    let rows = vec![NutritionItem {
        name: "Sódio".into(),
        amount: "120mg".into(),
        daily_value: "5%".into(),
    }];

    app.apply_task_result(TaskResult::NutritionGenerated(Ok(None)));
    assert_eq!(app.config.nutrition, LabelConfig::default().nutrition);

    app.apply_task_result(TaskResult::NutritionGenerated(Ok(Some(rows.clone()))));
    assert_eq!(app.config.nutrition, rows);
}

#[test]
fn assist_is_unavailable_without_credentials() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();
    assert!(!app.assist_available());

    app.improve_field(&ctx, AssistField::Ingredients);
    app.generate_nutrition(&ctx);
    assert!(!app.busy);
}

#[test]
fn sign_in_result_sets_identity_and_token() {
    let mut app = LabelDesignerApp::default();
    app.account.show_login = true;
    app.account.signing_in = true;
    let session = Session {
        access_token: "tok".into(),
        refresh_token: None,
    };

    app.apply_task_result(TaskResult::SignedIn {
        session: session.clone(),
        result: Err(AuthError::Api {
            status: 401,
            message: "expired".into(),
        }),
    });
    assert_eq!(app.account.user, None);
    assert_eq!(app.notification.as_deref(), Some("Falha no login: expired"));

    app.apply_task_result(TaskResult::SignedIn {
        session,
        result: Ok(user()),
    });
    assert_eq!(app.account.user, Some(user()));
    assert_eq!(app.account.access_token.as_deref(), Some("tok"));
    assert!(!app.account.show_login);
    assert!(!app.account.signing_in);
}

#[test]
fn email_sign_in_and_logout() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();

    app.account.login_email = "  ".into();
    assert!(!app.sign_in_with_email());
    assert_eq!(app.notification.as_deref(), Some("Informe um e-mail."));

    app.account.login_email = "caio@mercado.com".into();
    app.account.show_login = true;
    assert!(app.sign_in_with_email());
    let signed_in = app.account.user.clone().expect("user should be set");
    assert_eq!(signed_in.name, "caio");
    assert_eq!(signed_in.provider, AuthProvider::Email);
    assert!(!app.account.show_login);

    app.logout(&ctx);
    assert_eq!(app.account.user, None);
}

#[test]
fn bad_callback_is_reported() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();

    app.complete_sign_in(&ctx, "http://localhost:3000/#error=access_denied");
    assert_eq!(
        app.notification.as_deref(),
        Some("Link de retorno inválido: nenhum token encontrado.")
    );
    assert!(!app.account.signing_in);
}

#[test]
fn printing_is_blocked_by_validation_errors() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();
    app.config.width = 15.0;

    assert!(!app.print_label(&ctx));
    assert_eq!(app.notification.as_deref(), Some("Erro: Layout incompleto"));
}

#[test]
fn malformed_label_file_keeps_the_config() {
    let mut app = LabelDesignerApp::default();
    app.config.product_name = "ORIGINAL".into();

    assert!(!app.import_config_json("{ not json"));
    assert_eq!(app.notification.as_deref(), Some("Erro no arquivo"));
    assert_eq!(app.config.product_name, "ORIGINAL");

    app.notification = None;
    assert!(app.import_config_json(r#"{"productName":"NOVO","width":80}"#));
    assert_eq!(app.config.product_name, "NOVO");
    assert_eq!(app.config.width, 80.0);
    assert_eq!(app.notification, None);
}

#[test]
fn file_failures_are_shown() {
    let mut app = LabelDesignerApp::default();
    app.apply_task_result(TaskResult::DialogCancelled);
    assert_eq!(app.notification, None);

    app.apply_task_result(TaskResult::FileFailed("Falha ao ler arquivo".into()));
    assert_eq!(app.notification.as_deref(), Some("Falha ao ler arquivo"));
}

#[test]
fn overlapping_store_requests_keep_syncing_until_all_answer() {
    let mut app = LabelDesignerApp::default();
    app.sync.start();
    app.sync.start();
    assert_eq!(app.sync.in_flight(), 2);

    app.apply_task_result(TaskResult::TemplatesFetched(Ok(vec![template("A", "A")])));
    assert!(app.sync.syncing(), "the save is still pending");

    app.apply_task_result(TaskResult::TemplateSaved {
        template: template("B", "B"),
        result: Ok(()),
    });
    assert!(!app.sync.syncing());
    assert_eq!(app.library.len(), 2);

    // A stray answer does not underflow the counter
    app.apply_task_result(TaskResult::TemplateDeleted {
        id: uuid::Uuid::new_v4(),
        result: Ok(()),
    });
    assert_eq!(app.sync.in_flight(), 0);
}

#[test]
fn retry_clears_the_banner() {
    let mut app = LabelDesignerApp::default();
    let ctx = egui::Context::default();
    app.sync.db_error = Some(DbError {
        message: "x".into(),
        table_missing: true,
    });

    app.refresh_templates(&ctx);
    assert_eq!(app.sync.db_error, None);
    assert!(!app.sync.syncing());
}

mod remote {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn app_for(server: &MockServer) -> LabelDesignerApp {
        LabelDesignerApp::with_settings(Settings {
            supabase: Some(SupabaseSettings {
                url: server.base_url(),
                anon_key: "anon".into(),
            }),
            gemini: None,
            http_timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn remote_save_lands_after_the_insert_succeeds() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST).path("/rest/v1/templates");
            then.status(201);
        }).await;

        let mut app = app_for(&server);
        let ctx = egui::Context::default();
        app.new_template_name = "Bolo de Fubá".into();
        app.save_template(&ctx);

        // Nothing changes until the store answers
        assert!(app.library.is_empty());
        assert!(app.sync.syncing());

        assert!(app.wait_for_task(Duration::from_secs(5)));
        mock.assert_async().await;
        assert_eq!(app.library.len(), 1);
        assert_eq!(app.library.templates()[0].name, "Bolo de Fubá");
        assert!(app.new_template_name.is_empty());
        assert!(!app.sync.syncing());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_table_shows_the_setup_banner() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/rest/v1/templates");
            then.status(404).json_body(json!({
                "code": "PGRST205",
                "message": "Could not find the table 'public.templates' in the schema cache"
            }));
        }).await;

        let mut app = app_for(&server);
        app.library = TemplateLibrary::new(vec![template("Local", "LOCAL")]);
        let ctx = egui::Context::default();
        app.refresh_templates(&ctx);

        assert!(app.wait_for_task(Duration::from_secs(5)));
        let banner = app.sync.db_error.clone().expect("banner should be set");
        assert!(banner.table_missing);
        assert_eq!(app.library.len(), 1);
    }
}

