//! Login and registration forms.
//!
//! The forms only validate and collect input; the app decides which
//! identity provider handles the submitted credentials.

use campo_core::session::{validate_login, validate_register, FormErrors};
use dioxus::prelude::*;

/// Credentials collected by the auth forms. `username` is empty on login.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Props, Clone, PartialEq)]
pub struct FieldErrorProps {
    pub message: Option<&'static str>,
}

#[component]
fn FieldError(props: FieldErrorProps) -> Element {
    match props.message {
        Some(message) => rsx! {
            div { style: "color: #C62828; font-size: 12px; margin-top: 2px;", "{message}" }
        },
        None => rsx! {},
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct AuthFormProps {
    /// Provider or backend failure from the last attempt
    #[props(default)]
    pub error: Option<String>,
    /// True while the provider call is in flight
    #[props(default = false)]
    pub busy: bool,
    pub on_submit: EventHandler<Credentials>,
    /// Switch to the other form
    pub on_switch: EventHandler<()>,
}

const FORM_STYLE: &str = "max-width: 320px; margin: 40px auto; padding: 24px; border: 1px solid #E0E0E0; border-radius: 4px; display: flex; flex-direction: column; gap: 12px;";
const INPUT_STYLE: &str = "width: 100%; padding: 6px; box-sizing: border-box;";

/// Email and password sign-in.
#[component]
pub fn LoginForm(props: AuthFormProps) -> Element {
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(FormErrors::default);
    let submit = props.on_submit;
    let switch = props.on_switch;

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let found = validate_login(&email(), &password());
        let valid = found.is_empty();
        errors.set(found);
        if valid {
            submit.call(Credentials {
                username: String::new(),
                email: email().trim().to_string(),
                password: password(),
            });
        }
    };

    rsx! {
        form {
            style: FORM_STYLE,
            onsubmit: on_submit,
            h2 { style: "margin: 0;", "Iniciar sesión" }
            if let Some(err) = props.error.clone() {
                div { style: "color: #C62828;", "{err}" }
            }
            label {
                "Email"
                input {
                    r#type: "email",
                    style: INPUT_STYLE,
                    value: "{email}",
                    oninput: move |evt: Event<FormData>| email.set(evt.value()),
                }
                FieldError { message: errors.read().email }
            }
            label {
                "Contraseña"
                input {
                    r#type: "password",
                    style: INPUT_STYLE,
                    value: "{password}",
                    oninput: move |evt: Event<FormData>| password.set(evt.value()),
                }
                FieldError { message: errors.read().password }
            }
            button { r#type: "submit", disabled: props.busy, "Ingresar" }
            button {
                r#type: "button",
                style: "background: none; border: none; color: #1976D2; cursor: pointer;",
                onclick: move |_| switch.call(()),
                "¿No tenés cuenta? Registrate"
            }
        }
    }
}

/// Account creation with a display name.
#[component]
pub fn RegisterForm(props: AuthFormProps) -> Element {
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(FormErrors::default);
    let submit = props.on_submit;
    let switch = props.on_switch;

    let on_submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let found = validate_register(&username(), &email(), &password());
        let valid = found.is_empty();
        errors.set(found);
        if valid {
            submit.call(Credentials {
                username: username().trim().to_string(),
                email: email().trim().to_string(),
                password: password(),
            });
        }
    };

    rsx! {
        form {
            style: FORM_STYLE,
            onsubmit: on_submit,
            h2 { style: "margin: 0;", "Crear cuenta" }
            if let Some(err) = props.error.clone() {
                div { style: "color: #C62828;", "{err}" }
            }
            label {
                "Nombre de usuario"
                input {
                    r#type: "text",
                    style: INPUT_STYLE,
                    value: "{username}",
                    oninput: move |evt: Event<FormData>| username.set(evt.value()),
                }
                FieldError { message: errors.read().username }
            }
            label {
                "Email"
                input {
                    r#type: "email",
                    style: INPUT_STYLE,
                    value: "{email}",
                    oninput: move |evt: Event<FormData>| email.set(evt.value()),
                }
                FieldError { message: errors.read().email }
            }
            label {
                "Contraseña"
                input {
                    r#type: "password",
                    style: INPUT_STYLE,
                    value: "{password}",
                    oninput: move |evt: Event<FormData>| password.set(evt.value()),
                }
                FieldError { message: errors.read().password }
            }
            button { r#type: "submit", disabled: props.busy, "Registrarse" }
            button {
                r#type: "button",
                style: "background: none; border: none; color: #1976D2; cursor: pointer;",
                onclick: move |_| switch.call(()),
                "¿Ya tenés cuenta? Iniciá sesión"
            }
        }
    }
}
