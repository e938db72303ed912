//! Reminder templates and the placeholder renderer.
//!
//! Templates are tenant-authored text with a closed set of recognized
//! placeholders:
//! - `{NOME_CLIENTE}`, `{EMPRESA}`, `{DESCRICAO}`, `{VALOR}`, `{VENCIMENTO}`
//! - `{DIAS}`, `{LINK_PAGAMENTO}`, `{PIX_COPIA_COLA}`, `{CONTATO}`,
//!   `{ASSINATURA}`
//!
//! Anything else in braces passes through verbatim. Rendering is pure, all
//! I/O happens elsewhere.

// Template kinds //
//****************//

/// Escalation level of a reminder, keyed off how overdue the invoice is on
/// the day the rule fires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemplateKind {
	PreDue,
	DueToday,
	OverdueL1,
	OverdueL2,
}

impl TemplateKind {
	pub fn preset(self) -> &'static TemplatePreset {
		match self {
			TemplateKind::PreDue => &PRE_DUE,
			TemplateKind::DueToday => &DUE_TODAY,
			TemplateKind::OverdueL1 => &OVERDUE_L1,
			TemplateKind::OverdueL2 => &OVERDUE_L2,
		}
	}
}

/// Escalation by days overdue: before due, on the day, lightly late (up to
/// three days), seriously late.
pub fn select_template(days_overdue: i64) -> TemplateKind {
	if days_overdue < 0 {
		TemplateKind::PreDue
	} else if days_overdue == 0 {
		TemplateKind::DueToday
	} else if days_overdue <= 3 {
		TemplateKind::OverdueL1
	} else {
		TemplateKind::OverdueL2
	}
}

// Built-in presets //
//******************//

/// Built-in subject/body pair. Used as the default when a rule is created
/// without explicit templates.
#[derive(Clone, Copy, Debug)]
pub struct TemplatePreset {
	pub kind: TemplateKind,
	pub subject: &'static str,
	pub body: &'static str,
}

pub const PRE_DUE: TemplatePreset = TemplatePreset {
	kind: TemplateKind::PreDue,
	subject: "Lembrete: {DESCRICAO} vence em {VENCIMENTO}",
	body: "Olá, {NOME_CLIENTE}! Tudo bem?\n\n\
		Passando para lembrar que a cobrança {DESCRICAO} no valor de {VALOR} vence em {VENCIMENTO}.\n\n\
		Para pagar, é só acessar: {LINK_PAGAMENTO}\n\n\
		Se você já realizou o pagamento, por favor desconsidere esta mensagem.\n\n\
		Obrigado!\n{ASSINATURA}\nContato: {CONTATO}",
};

pub const DUE_TODAY: TemplatePreset = TemplatePreset {
	kind: TemplateKind::DueToday,
	subject: "Vence hoje: {DESCRICAO} ({VALOR})",
	body: "Olá, {NOME_CLIENTE}!\n\n\
		Este é um lembrete de que a cobrança {DESCRICAO} no valor de {VALOR} vence hoje ({VENCIMENTO}).\n\n\
		Pagamento por aqui: {LINK_PAGAMENTO}\n\n\
		Se precisar de ajuda ou tiver algum ajuste para fazer, é só responder este e-mail.\n\n\
		Atenciosamente,\n{ASSINATURA}\nContato: {CONTATO}",
};

pub const OVERDUE_L1: TemplatePreset = TemplatePreset {
	kind: TemplateKind::OverdueL1,
	subject: "{NOME_CLIENTE}, cobrança em aberto desde {VENCIMENTO}",
	body: "Olá, {NOME_CLIENTE}! Tudo certo?\n\n\
		Notamos que a cobrança {DESCRICAO} no valor de {VALOR}, com vencimento em {VENCIMENTO}, ainda consta como em aberto.\n\n\
		Para regularizar, segue o link: {LINK_PAGAMENTO}\n\n\
		Se já pagou, por favor nos avise (ou desconsidere esta mensagem).\n\
		Se precisar negociar uma nova data, podemos ajudar.\n\n\
		Obrigado,\n{ASSINATURA}\nContato: {CONTATO}",
};

pub const OVERDUE_L2: TemplatePreset = TemplatePreset {
	kind: TemplateKind::OverdueL2,
	subject: "Aviso: regularização pendente – {DESCRICAO}",
	body: "Olá, {NOME_CLIENTE}.\n\n\
		A cobrança {DESCRICAO} (valor {VALOR}) venceu em {VENCIMENTO} e ainda está pendente em nosso sistema.\n\n\
		Link para pagamento: {LINK_PAGAMENTO}\n\n\
		Se houver qualquer impedimento, responda este e-mail informando uma previsão de pagamento ou solicitando renegociação. Assim conseguimos evitar novas notificações.\n\n\
		Atenciosamente,\n{ASSINATURA}\nContato: {CONTATO}",
};

/// Default preset for a rule, chosen from the rule's own day offset.
pub fn preset_for_offset(
	days_before: Option<u32>,
	days_after: Option<u32>,
) -> &'static TemplatePreset {
	let days_overdue = match (days_before, days_after) {
		(Some(days), _) => -i64::from(days),
		(None, Some(days)) => i64::from(days),
		(None, None) => 0,
	};
	select_template(days_overdue).preset()
}

// Rendering //
//***********//

/// Values substituted into a template. All formatting happens before the
/// substitution pass; the renderer only pastes strings.
#[derive(Debug, Default)]
pub struct RenderVars<'a> {
	pub client_name: &'a str,
	pub tenant_name: &'a str,
	pub description: &'a str,
	/// Pre-formatted amount, e.g. `R$ 150.00`
	pub amount: &'a str,
	/// Pre-formatted due date, `dd/MM/yyyy`
	pub due_date: &'a str,
	pub days: Option<i64>,
	pub payment_link: Option<&'a str>,
	pub pix_code: Option<&'a str>,
	pub contact: Option<&'a str>,
	/// Defaults to `Equipe {tenant_name}` when not set
	pub signature: Option<&'a str>,
}

/// Replaces every occurrence of each recognized placeholder. Missing
/// optional values render as empty strings. A supplied PIX code is also
/// appended as a trailing "copia e cola" line so it survives templates that
/// never mention the placeholder.
pub fn render(template: &str, vars: &RenderVars) -> String {
	let days = vars.days.map(|days| days.to_string()).unwrap_or_default();
	let signature = match vars.signature {
		Some(signature) => signature.to_string(),
		None => format!("Equipe {}", vars.tenant_name),
	};
	let pix_code = vars.pix_code.filter(|code| !code.is_empty());

	let replacements = [
		("{NOME_CLIENTE}", vars.client_name),
		("{EMPRESA}", vars.tenant_name),
		("{DESCRICAO}", vars.description),
		("{VALOR}", vars.amount),
		("{VENCIMENTO}", vars.due_date),
		("{DIAS}", days.as_str()),
		("{LINK_PAGAMENTO}", vars.payment_link.unwrap_or("")),
		("{PIX_COPIA_COLA}", pix_code.unwrap_or("")),
		("{CONTATO}", vars.contact.unwrap_or("")),
		("{ASSINATURA}", signature.as_str()),
	];

	let mut rendered = template.to_string();
	for (placeholder, value) in replacements {
		if rendered.contains(placeholder) {
			rendered = rendered.replace(placeholder, value);
		}
	}

	if let Some(code) = pix_code {
		rendered.push_str("\n\nPIX (copia e cola): ");
		rendered.push_str(code);
	}

	rendered
}

#[cfg(test)]
mod tests {
	use super::*;

	fn vars<'a>() -> RenderVars<'a> {
		RenderVars {
			client_name: "João Silva",
			tenant_name: "Acme Cobranças",
			description: "Mensalidade de manutenção",
			amount: "R$ 150.00",
			due_date: "15/06/2025",
			days: Some(3),
			payment_link: Some("https://pay.acme.com.br/42"),
			pix_code: None,
			contact: Some("(11) 98765-4321"),
			signature: None,
		}
	}

	#[test]
	fn test_select_template_escalation() {
		assert_eq!(select_template(-3), TemplateKind::PreDue);
		assert_eq!(select_template(-1), TemplateKind::PreDue);
		assert_eq!(select_template(0), TemplateKind::DueToday);
		assert_eq!(select_template(1), TemplateKind::OverdueL1);
		assert_eq!(select_template(3), TemplateKind::OverdueL1);
		assert_eq!(select_template(4), TemplateKind::OverdueL2);
		assert_eq!(select_template(30), TemplateKind::OverdueL2);
	}

	#[test]
	fn test_preset_for_offset() {
		assert_eq!(preset_for_offset(Some(3), None).kind, TemplateKind::PreDue);
		assert_eq!(preset_for_offset(Some(0), None).kind, TemplateKind::DueToday);
		assert_eq!(preset_for_offset(None, Some(2)).kind, TemplateKind::OverdueL1);
		assert_eq!(preset_for_offset(None, Some(7)).kind, TemplateKind::OverdueL2);
	}

	#[test]
	fn test_render_replaces_every_occurrence() {
		let out = render("{NOME_CLIENTE} e {NOME_CLIENTE} de {EMPRESA}", &vars());

		assert_eq!(out, "João Silva e João Silva de Acme Cobranças");
	}

	#[test]
	fn test_render_is_deterministic() {
		let template = PRE_DUE.body;

		assert_eq!(render(template, &vars()), render(template, &vars()));
	}

	#[test]
	fn test_unrecognized_placeholders_pass_through() {
		let out = render("{FOO} {NOME_CLIENTE} {bar}", &vars());

		assert_eq!(out, "{FOO} João Silva {bar}");
	}

	#[test]
	fn test_missing_optionals_render_empty() {
		let vars = RenderVars {
			client_name: "João Silva",
			tenant_name: "Acme",
			description: "Mensalidade",
			amount: "R$ 10.00",
			due_date: "01/01/2025",
			..Default::default()
		};
		let out = render("[{DIAS}][{LINK_PAGAMENTO}][{PIX_COPIA_COLA}][{CONTATO}]", &vars);

		assert_eq!(out, "[][][][]");
	}

	#[test]
	fn test_signature_defaults_to_team() {
		let out = render("{ASSINATURA}", &vars());

		assert_eq!(out, "Equipe Acme Cobranças");
	}

	#[test]
	fn test_explicit_signature_wins() {
		let mut vars = vars();
		vars.signature = Some("Financeiro Acme");

		assert_eq!(render("{ASSINATURA}", &vars), "Financeiro Acme");
	}

	#[test]
	fn test_pix_appends_trailing_line() {
		let mut vars = vars();
		vars.pix_code = Some("00020126pix-chave");
		let out = render("Corpo do lembrete", &vars);

		assert_eq!(out, "Corpo do lembrete\n\nPIX (copia e cola): 00020126pix-chave");
	}

	#[test]
	fn test_empty_pix_code_is_ignored() {
		let mut vars = vars();
		vars.pix_code = Some("");
		let out = render("Corpo [{PIX_COPIA_COLA}]", &vars);

		assert_eq!(out, "Corpo []");
	}

	#[test]
	fn test_preset_renders_subject_and_body() {
		let subject = render(PRE_DUE.subject, &vars());
		let body = render(PRE_DUE.body, &vars());

		assert_eq!(subject, "Lembrete: Mensalidade de manutenção vence em 15/06/2025");
		assert!(body.contains("no valor de R$ 150.00 vence em 15/06/2025"));
		assert!(body.contains("é só acessar: https://pay.acme.com.br/42"));
		assert!(body.ends_with("Obrigado!\nEquipe Acme Cobranças\nContato: (11) 98765-4321"));
	}

}

// vim: ts=4
