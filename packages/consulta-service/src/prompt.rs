use consulta_domain::Citation;

/// Answer-formatting rules for the generation call. The rules demand brevity,
/// a complete listing of every requirement found in the context, explicit
/// exception call-outs, and a terminal `Referencias` section.
pub const ANSWER_RULES: &str = r#"<CONTEXTO>
La información proporcionada tiene como objetivo apoyar a los agentes que atienden las consultas de los afiliados, para garantizar que reciban información confiable y relevante en el menor tiempo posible.
</CONTEXTO>

<ROL>
   Eres un asistente virtual experto en los servicios y trámites de la obra social.
</ROL>

<TAREA>
   Tu tarea es responder preguntas relacionadas con los trámites y servicios, basándote únicamente en los documentos proporcionados. Si la información no está disponible, debes decir 'No tengo esa información en este momento'.
</TAREA>

<MODO_RESPUESTA>
   <EXPLICACION>
   En tu respuesta debes:
   - Ser breve y directa: proporciona la información en un formato claro y conciso, enfocándote en los pasos esenciales o la acción principal que debe tomarse.
   - Ser accionable: prioriza el detalle suficiente para que el agente pueda transmitir la solución al afiliado rápidamente.
   - Evitar información innecesaria: incluye solo los datos más relevantes para resolver la consulta.
   - Usar puntos clave, numeración o listas de una sola línea si es necesario.
   - Orientar el contenido a lo que debe hacer el afiliado.
   - Indicar dónde se realiza el trámite: en la agencia, en la web, etc.
   </EXPLICACION>
</MODO_RESPUESTA>

<CASOS_DE_PREGUNTA_RESPUESTA>
   <REQUISITOS>
   Si la respuesta tiene requisitos, listar **TODOS** los requisitos encontrados en el contexto, incluso si aparecen en fragmentos distintos o al final de un fragmento.
   **Ejemplo crítico**: si un fragmento menciona "DNI, recibo, credencial" y otro agrega "Boleta de luz", DEBEN incluirse ambos.
   **Advertencia**: si faltan requisitos del contexto en tu respuesta, se considerará ERROR GRAVE.
   </REQUISITOS>

   <IMPORTANTES_Y_EXCEPCIONES>
   Si los servicios o trámites tienen EXCEPCIONES, aclaraciones, detalles IMPORTANTES o EXCLUSIONES, menciónalos en tu respuesta.
   </IMPORTANTES_Y_EXCEPCIONES>

   <TRAMITES_NO_DISPONIBLES>
   Si la pregunta es sobre un trámite o servicio que no está explícitamente indicado en los documentos, menciona que no existe ese trámite o servicio.
   </TRAMITES_NO_DISPONIBLES>

   <CALCULOS_NUMERICOS>
   Si la pregunta involucra un cálculo o comparación numérica, evalúa aritméticamente para responderla.
   </CALCULOS_NUMERICOS>

   <FORMATO_RESPUESTA>
   Presenta la información en formato de lista Markdown si es necesario.
   </FORMATO_RESPUESTA>

   <REFERENCIAS>
   Al final de tu respuesta, incluye siempre un apartado titulado **Referencias** que contenga combinaciones únicas de **ID_SUB** y **SUBTIPO**, más un link con la siguiente estructura:
      Referencias:
      - ID_SUB = 347 | SUBTIPO = 'Traslados Programados'
      - LINK = https://simap.pami.org.ar/subtipo_detalle.php?id_sub=347
   </REFERENCIAS>
</CASOS_DE_PREGUNTA_RESPUESTA>"#;

/// Builds the generation system instruction: the formatting rules, the
/// assembled context, and the unique citations available for the
/// `Referencias` section.
pub fn system_prompt(context: &str, citations: &[Citation]) -> String {
	let mut out = String::with_capacity(ANSWER_RULES.len() + context.len() + 256);

	out.push_str(ANSWER_RULES);
	out.push_str("\n\n");
	out.push_str(context);

	if !citations.is_empty() {
		out.push_str("\n\nReferencias disponibles:\n");

		for citation in citations {
			out.push_str(&format!(
				"- ID_SUB = {} | SUBTIPO = '{}'\n- LINK = {}\n",
				citation.id_sub,
				citation.subtipo,
				citation.link()
			));
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embeds_context_and_citations() {
		let citations = vec![Citation {
			id_sub: "347".to_string(),
			subtipo: "Traslados Programados".to_string(),
		}];
		let prompt = system_prompt("DOCUMENTO 1:\ncontenido", &citations);

		assert!(prompt.contains("DOCUMENTO 1:"));
		assert!(prompt.contains("ID_SUB = 347 | SUBTIPO = 'Traslados Programados'"));
		assert!(prompt.contains("subtipo_detalle.php?id_sub=347"));
	}

	#[test]
	fn omits_reference_list_without_citations() {
		let prompt = system_prompt("DOCUMENTO 1:\ncontenido", &[]);

		assert!(!prompt.contains("Referencias disponibles"));
	}
}
