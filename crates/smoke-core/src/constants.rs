//! Constantes del harness.
//!
//! Agrupa los valores por defecto del objetivo que se valida (Darknet /
//! YOLOv3) y las firmas de fallo conocidas. La configuración del binario
//! puede sobrescribir casi todos, salvo las clases de excepción que usa el
//! clasificador.

/// Versión lógica del harness. Se emite en `RunStarted` y en el registro JSON.
pub const HARNESS_VERSION: &str = "S1.0";

/// Nombre del documento de configuración (`config/<name>.cfg`).
pub const DEFAULT_CONFIG_NAME: &str = "yolov3";

/// Paquete del layout empaquetado (`<package>/config/<name>.cfg`, `<package>.models`).
pub const DEFAULT_PACKAGE: &str = "pytorchyolo";

/// Módulo raíz del layout plano (`from models import Darknet`).
pub const DEFAULT_ROOT_MODULE: &str = "models";

/// Símbolo del constructor del modelo.
pub const DEFAULT_MODEL_SYMBOL: &str = "Darknet";

/// Fuente remota, versionada, del `.cfg` de YOLOv3.
pub const DEFAULT_CONFIG_URL: &str = "https://raw.githubusercontent.com/pjreddie/darknet/master/cfg/yolov3.cfg";

/// Tamaño espacial de la entrada sintética (alto = ancho).
pub const DEFAULT_INPUT_SIZE: u32 = 416;

/// Firmas del alias entero eliminado en NumPy 1.24 (`np.int`).
pub const LEGACY_INT_ALIAS_SIGNATURES: &[&str] = &["module 'numpy' has no attribute 'int'", "np.int"];

/// Clase de excepción de acceso a atributo inválido.
pub const ATTRIBUTE_ERROR_CLASS: &str = "AttributeError";

/// Clase de excepción de fichero inexistente.
pub const FILE_NOT_FOUND_CLASS: &str = "FileNotFoundError";

/// Mensaje del sistema operativo para ficheros inexistentes.
pub const MISSING_FILE_MESSAGE: &str = "No such file or directory";
