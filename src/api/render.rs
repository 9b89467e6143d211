//! Minimal server-rendered HTML views.
//!
//! The service has no templating engine; pages are small `format!`-built
//! documents. All user-controlled values pass through [`escape`].

use crate::config::AppConfig;
use crate::domain::{Evento, Flash};
use crate::persistence::RegistroConEvento;

/// Escapes a value for safe interpolation into HTML text or attributes.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Shared document scaffold.
fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"es\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title></head><body>{body}</body></html>",
        title = escape(title),
    )
}

fn flash_block(flash: Option<&Flash>) -> String {
    flash.map_or_else(String::new, |f| {
        format!(
            "<p class=\"flash {kind}\">{msg}</p>",
            kind = f.kind,
            msg = escape(&f.message)
        )
    })
}

/// Public registration form for an active event.
#[must_use]
pub fn registro_form(evento: &Evento, config: &AppConfig) -> String {
    let lugar = evento
        .lugar
        .as_deref()
        .map_or_else(String::new, |l| format!("<p>{}</p>", escape(l)));
    let body = format!(
        "<h1>{titulo}</h1>{lugar}\
         <form method=\"post\" action=\"{action}\">\
         <input type=\"hidden\" name=\"slug\" value=\"{slug}\">\
         <label>Nombre <input name=\"nombre\" required></label>\
         <label>Apellidos <input name=\"apellidos\" required></label>\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Teléfono <input name=\"telefono\"></label>\
         <label>Institución <input name=\"institucion\"></label>\
         <label>Carrera o área <input name=\"carrera_o_area\"></label>\
         <label>Temas de interés <input name=\"temas_interes\"></label>\
         <label><input type=\"checkbox\" name=\"consentimiento\"> Acepto el aviso de privacidad</label>\
         <button type=\"submit\">Registrarme</button>\
         </form>",
        titulo = escape(&evento.titulo),
        slug = escape(&evento.slug),
        action = config.path("/api/registro"),
    );
    layout(&evento.titulo, &body)
}

/// Static confirmation page shown after a successful registration.
#[must_use]
pub fn success_page() -> String {
    layout(
        "Registro completado",
        "<h1>¡Listo!</h1><p>Tu registro quedó guardado. Nos vemos en el evento.</p>",
    )
}

/// Admin login form, with an optional flashed error.
#[must_use]
pub fn login_page(flash: Option<&Flash>, config: &AppConfig) -> String {
    let body = format!(
        "<h1>Acceso administración</h1>{flash}\
         <form method=\"post\" action=\"{action}\">\
         <label>Usuario <input name=\"user\"></label>\
         <label>Contraseña <input type=\"password\" name=\"password\"></label>\
         <button type=\"submit\">Entrar</button>\
         </form>",
        flash = flash_block(flash),
        action = config.path("/admin/login"),
    );
    layout("Acceso administración", &body)
}

/// Admin panel: event selector, creation form, and the registration
/// listing for the selected slug.
#[must_use]
pub fn panel_page(
    flash: Option<&Flash>,
    eventos: &[Evento],
    registros: &[RegistroConEvento],
    slug: &str,
    config: &AppConfig,
) -> String {
    let mut opciones = String::new();
    for e in eventos {
        let marker = if e.activo { " (activo)" } else { "" };
        opciones.push_str(&format!(
            "<option value=\"{slug}\"{sel}>{titulo}{marker}</option>",
            slug = escape(&e.slug),
            sel = if e.slug == slug { " selected" } else { "" },
            titulo = escape(&e.titulo),
        ));
    }

    let mut filas = String::new();
    for r in registros {
        filas.push_str(&format!(
            "<tr><td>{nombre} {apellidos}</td><td>{email}</td><td>{institucion}</td>\
             <td>{consent}</td><td>{creado}</td></tr>",
            nombre = escape(&r.nombre),
            apellidos = escape(&r.apellidos),
            email = escape(&r.email),
            institucion = escape(r.institucion.as_deref().unwrap_or("")),
            consent = if r.consentimiento { "sí" } else { "no" },
            creado = r.creado_en.format("%Y-%m-%d %H:%M:%S"),
        ));
    }

    let listado = if slug.is_empty() {
        String::new()
    } else {
        format!(
            "<h2>Registros ({n})</h2>\
             <p><a href=\"{export}?slug={slug_url}\">Descargar CSV</a></p>\
             <table><tr><th>Nombre</th><th>Email</th><th>Institución</th>\
             <th>Consentimiento</th><th>Registrado</th></tr>{filas}</table>",
            n = registros.len(),
            export = config.path("/admin/export"),
            slug_url = escape(slug),
        )
    };

    let activar_forms: String = eventos
        .iter()
        .filter(|e| !e.activo)
        .map(|e| {
            format!(
                "<form method=\"post\" action=\"{action}\" style=\"display:inline\">\
                 <button type=\"submit\">Activar {titulo}</button></form>",
                action = config.path(&format!("/admin/evento/{}/activar", e.id)),
                titulo = escape(&e.titulo),
            )
        })
        .collect();

    let body = format!(
        "<h1>Panel de administración</h1>{flash}\
         <p><a href=\"{logout}\">Salir</a></p>\
         <form method=\"get\" action=\"{panel}\">\
         <select name=\"slug\"><option value=\"\">— evento —</option>{opciones}</select>\
         <button type=\"submit\">Ver registros</button>\
         </form>\
         {activar_forms}\
         <h2>Nuevo evento</h2>\
         <form method=\"post\" action=\"{crear}\">\
         <label>Slug <input name=\"slug\" required></label>\
         <label>Título <input name=\"titulo\" required></label>\
         <label>Inicio <input name=\"fecha_inicio\" placeholder=\"2025-08-20T18:30\"></label>\
         <label>Fin <input name=\"fecha_fin\"></label>\
         <label>Lugar <input name=\"lugar\"></label>\
         <label><input type=\"checkbox\" name=\"activo\"> Activo</label>\
         <button type=\"submit\">Crear</button>\
         </form>\
         {listado}",
        flash = flash_block(flash),
        logout = config.path("/admin/logout"),
        panel = config.path("/admin"),
        crear = config.path("/admin/evento"),
    );
    layout("Panel de administración", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn evento(slug: &str, titulo: &str, activo: bool) -> Evento {
        Evento {
            id: 1,
            slug: slug.to_string(),
            titulo: titulo.to_string(),
            fecha_inicio: None,
            fecha_fin: None,
            lugar: None,
            activo,
            creado_en: Utc::now(),
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            listen_addr: "0.0.0.0:3000".parse().unwrap_or_else(|_| unreachable!()),
            database_url: String::new(),
            database_max_connections: 1,
            database_min_connections: 1,
            database_acquire_timeout_secs: 1,
            admin_user: "admin".to_string(),
            admin_password: "admin123".to_string(),
            url_prefix: "/registro".to_string(),
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>\"x\" & 'y'</script>"),
            "&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn form_posts_to_prefixed_api_path() {
        let html = registro_form(&evento("taller", "Taller <IA>", true), &config());
        assert!(html.contains("action=\"/registro/api/registro\""));
        assert!(html.contains("Taller &lt;IA&gt;"));
        assert!(html.contains("name=\"slug\" value=\"taller\""));
    }

    #[test]
    fn login_page_shows_flash() {
        let flash = Flash::danger("Credenciales inválidas");
        let html = login_page(Some(&flash), &config());
        assert!(html.contains("Credenciales inválidas"));
        assert!(html.contains("class=\"flash danger\""));
    }

    #[test]
    fn panel_lists_events_and_marks_selection() {
        let eventos = vec![
            evento("a", "Evento A", true),
            evento("b", "Evento B", false),
        ];
        let html = panel_page(None, &eventos, &[], "b", &config());
        assert!(html.contains("value=\"b\" selected"));
        assert!(html.contains("(activo)"));
        // Only inactive events get an activate button.
        assert_eq!(html.matches("Activar ").count(), 1);
    }
}
