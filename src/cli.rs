//! Argumentos de línea de comandos (parseo manual, sin dependencias).

use std::path::PathBuf;

use crate::errors::CliError;

pub const USAGE: &str = "\
Uso: darknet-smoke [opciones]

Opciones:
  --root <dir>          Raíz del checkout del detector (por defecto SMOKE_ROOT o '.')
  --img-size <n>        Tamaño de la entrada sintética, múltiplo de 32 (por defecto 416)
  --json                Escribe el resultado como un registro JSON en stdout
                        (el progreso pasa a stderr)
  --result-file <path>  Escribe además el registro JSON en <path>
  -h, --help            Muestra esta ayuda

Códigos de salida: 0 pasa, 1 falla (incluida la incompatibilidad diagnosticada),
2 error de arranque.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub img_size: Option<u32>,
    pub json: bool,
    pub result_file: Option<PathBuf>,
    pub help: bool,
}

impl CliArgs {
    /// Interpreta los argumentos sin el nombre del programa.
    pub fn parse<I>(args: I) -> Result<Self, CliError>
        where I: IntoIterator<Item = String>
    {
        let args: Vec<String> = args.into_iter().collect();
        let mut parsed = CliArgs::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--root" => parsed.root = Some(PathBuf::from(value_of(&args, &mut i)?)),
                "--img-size" => {
                    let raw = value_of(&args, &mut i)?;
                    let size = raw.parse::<u32>().map_err(|_| CliError::InvalidValue { flag: "--img-size".into(),
                                                                                       value: raw.to_string() })?;
                    parsed.img_size = Some(size);
                }
                "--result-file" => parsed.result_file = Some(PathBuf::from(value_of(&args, &mut i)?)),
                "--json" => parsed.json = true,
                "-h" | "--help" => parsed.help = true,
                other => return Err(CliError::UnknownFlag(other.to_string())),
            }
            i += 1;
        }
        Ok(parsed)
    }
}

fn value_of<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, CliError> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .filter(|v| !v.starts_with("--"))
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue(flag.clone()))
}
