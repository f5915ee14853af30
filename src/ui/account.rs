//! Sign-in, sign-out and the account controls.

use eframe::egui;

use super::state::LabelDesignerApp;
use super::tasks::{spawn_task, TaskResult};
use crate::auth::{self, AuthError, Session};
use crate::types::{AppUser, AuthProvider};

/// URL the OAuth provider returns to.
fn redirect_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(location) = web_sys::window().map(|window| window.location()) {
            if let (Ok(origin), Ok(path)) = (location.origin(), location.pathname()) {
                return format!("{origin}{path}");
            }
        }
    }
    crate::constants::AUTH_REDIRECT_URL.to_string()
}

impl LabelDesignerApp {
    /// Opens the provider's sign-in page.
    pub fn start_oauth(&mut self, ctx: &egui::Context, provider: AuthProvider) {
        let Some(auth) = &self.services.auth else {
            self.notify(AuthError::NotConfigured.to_string());
            return;
        };
        match auth.authorize_url(provider, &redirect_url()) {
            Ok(url) => {
                log::info!("Starting {} sign-in", provider.as_str());
                #[cfg(target_arch = "wasm32")]
                ctx.open_url(egui::OpenUrl::same_tab(url.as_str()));
                #[cfg(not(target_arch = "wasm32"))]
                ctx.open_url(egui::OpenUrl::new_tab(url.as_str()));
            }
            Err(err) => {
                log::error!("Could not build the sign-in URL: {err}");
                self.notify(err.to_string());
            }
        }
    }

    /// Finishes an OAuth sign-in from the redirect URL (or its fragment).
    pub fn complete_sign_in(&mut self, ctx: &egui::Context, callback: &str) {
        let Some(session) = auth::parse_callback(callback) else {
            self.notify("Link de retorno inválido: nenhum token encontrado.");
            return;
        };
        let Some(auth) = self.services.auth.clone() else {
            self.notify(AuthError::NotConfigured.to_string());
            return;
        };
        self.account.signing_in = true;
        spawn_task(ctx, self.tasks.sender.clone(), async move {
            let result = auth.fetch_user(&session.access_token).await;
            TaskResult::SignedIn { session, result }
        });
    }

    /// Picks up a session the provider left in the page URL.
    #[cfg(target_arch = "wasm32")]
    pub(crate) fn complete_sign_in_from_location(&mut self, ctx: &egui::Context) {
        let Some(location) = web_sys::window().map(|window| window.location()) else {
            return;
        };
        let Ok(hash) = location.hash() else {
            return;
        };
        if hash.contains("access_token") {
            self.complete_sign_in(ctx, &hash);
            if let Err(err) = location.set_hash("") {
                log::warn!("Could not clear the sign-in fragment: {err:?}");
            }
        }
    }

    pub(crate) fn on_signed_in(&mut self, session: Session, result: Result<AppUser, AuthError>) {
        self.account.signing_in = false;
        match result {
            Ok(user) => {
                self.account.user = Some(user);
                self.account.access_token = Some(session.access_token);
                self.account.callback_input.clear();
                self.account.show_login = false;
            }
            Err(err) => {
                log::error!("Sign-in failed: {err}");
                self.notify(format!("Falha no login: {err}"));
            }
        }
    }

    /// Signs in with just an e-mail address.
    pub fn sign_in_with_email(&mut self) -> bool {
        match auth::email_user(&self.account.login_email) {
            Some(user) => {
                log::info!("Signed in locally as {}", user.email);
                self.account.user = Some(user);
                self.account.login_email.clear();
                self.account.show_login = false;
                true
            }
            None => {
                self.notify("Informe um e-mail.");
                false
            }
        }
    }

    /// Forgets the identity and closes the hosted session, if any.
    pub fn logout(&mut self, ctx: &egui::Context) {
        self.account.user = None;
        let token = self.account.access_token.take();
        if let (Some(token), Some(auth)) = (token, self.services.auth.clone()) {
            spawn_task(ctx, self.tasks.sender.clone(), async move {
                TaskResult::SignedOut(auth.sign_out(&token).await)
            });
        }
    }

    pub(crate) fn draw_account_controls(&mut self, ui: &mut egui::Ui) {
        match self.account.user.clone() {
            Some(user) => {
                ui.menu_button(format!("👤 {}", user.name), |ui| {
                    ui.label(egui::RichText::new(format!("Conta {}", user.provider.as_str())).small().weak());
                    ui.label(egui::RichText::new(&user.name).strong());
                    if !user.email.is_empty() {
                        ui.label(egui::RichText::new(&user.email).small());
                    }
                    ui.separator();
                    if ui.button("Trocar Conta").clicked() {
                        self.account.show_login = true;
                        ui.close();
                    }
                    if ui.button("Sair do Perfil").clicked() {
                        self.logout(ui.ctx());
                        ui.close();
                    }
                });
            }
            None => {
                if ui.button("CONECTAR").clicked() {
                    self.account.show_login = true;
                }
            }
        }
    }

    pub(crate) fn draw_login_window(&mut self, ctx: &egui::Context) {
        if !self.account.show_login {
            return;
        }
        let mut open = true;
        egui::Window::new("Entrar")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("LabelMaster Pro").heading());
                ui.weak("Criador de Etiquetas");
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.account.login_email)
                            .hint_text("seu@email.com")
                            .desired_width(200.0),
                    );
                    if ui.button("Entrar").clicked() {
                        self.sign_in_with_email();
                    }
                });

                ui.separator();
                let hosted = self.services.auth.is_some();
                ui.add_enabled_ui(hosted, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Entrar com Google").clicked() {
                            self.start_oauth(ui.ctx(), AuthProvider::Google);
                        }
                        if ui.button("Entrar com GitHub").clicked() {
                            self.start_oauth(ui.ctx(), AuthProvider::Github);
                        }
                    });
                    #[cfg(not(target_arch = "wasm32"))]
                    {
                        ui.label("Depois de autorizar, cole aqui o endereço de retorno:");
                        ui.horizontal(|ui| {
                            ui.text_edit_singleline(&mut self.account.callback_input);
                            let label = if self.account.signing_in {
                                "Entrando..."
                            } else {
                                "Concluir"
                            };
                            if ui
                                .add_enabled(!self.account.signing_in, egui::Button::new(label))
                                .clicked()
                            {
                                let callback = self.account.callback_input.clone();
                                self.complete_sign_in(ui.ctx(), &callback);
                            }
                        });
                    }
                });
                if !hosted {
                    ui.weak("Login social indisponível: Supabase não configurado.");
                }
            });
        if !open {
            self.account.show_login = false;
        }
    }
}
