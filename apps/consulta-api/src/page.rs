/// Results page for one document category. The answer is rendered inside a
/// `<pre>` block; handlebars escapes the interpolated values.
pub const CONSULTA_PAGE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
	<meta charset="utf-8">
	<title>Consultas — {{category}}</title>
</head>
<body>
	<h1>Consultas — {{category}}</h1>
	<form method="post" action="/consultas/{{category}}">
		<p><label>Pregunta<br><textarea name="pregunta" rows="3" cols="80">{{pregunta}}</textarea></label></p>
		<p><label>Fecha desde <input type="date" name="fecha_desde" value="{{fecha_desde}}"></label>
		<label>Fecha hasta <input type="date" name="fecha_hasta" value="{{fecha_hasta}}"></label>
		<label>Resultados <input type="number" name="k" value="{{k}}" min="1"></label></p>
		{{#if thread_id}}<input type="hidden" name="thread_id" value="{{thread_id}}">{{/if}}
		<p><button type="submit">Consultar</button></p>
	</form>
	{{#if resultado}}
	<section id="resultado">
		<h2>Resultado</h2>
		<pre>{{resultado}}</pre>
	</section>
	{{/if}}
</body>
</html>
"#;
