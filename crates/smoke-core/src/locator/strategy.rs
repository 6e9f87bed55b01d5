use thiserror::Error;

/// Señal de "no encontrado" propia de una estrategia (símbolo ausente, ruta
/// inexistente, ...). Nunca aborta la cadena de resolución.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct StrategyMiss {
    pub reason: String,
    /// Clase del error subyacente cuando lo hay (p.ej. `AttributeError` al
    /// importar un módulo).
    pub class: Option<String>,
}

impl StrategyMiss {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into(),
               class: None }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// Un método con nombre para localizar un artifact de tipo `T`.
///
/// `attempt` debe ser un intento puro: o devuelve el valor resuelto o una
/// `StrategyMiss`. El `Locator` no llama a estrategias posteriores a la
/// primera que tiene éxito.
pub trait ResolutionStrategy<T> {
    /// Identificador estable (aparece en logs y en el historial de intentos).
    fn id(&self) -> &str;

    fn attempt(&self) -> Result<T, StrategyMiss>;
}

/// Estrategia a partir de un closure. Útil para cableado ad-hoc y tests.
pub struct FnStrategy<F> {
    id: String,
    f: F,
}

impl<F> FnStrategy<F> {
    pub fn new(id: impl Into<String>, f: F) -> Self { Self { id: id.into(), f } }
}

impl<T, F> ResolutionStrategy<T> for FnStrategy<F> where F: Fn() -> Result<T, StrategyMiss>
{
    fn id(&self) -> &str { &self.id }

    fn attempt(&self) -> Result<T, StrategyMiss> { (self.f)() }
}
