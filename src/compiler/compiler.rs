//! Main compiler module.
//!
//! This module contains the core Compiler structure and the lowering entry
//! point. It manages the LLVM context, module creation, type conversion,
//! global storage and the initializer function that evaluates top-level
//! statements.

use std::{collections::HashMap, path::Path};

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType, StructType},
    values::{BasicValueEnum, FunctionValue, PointerValue},
    AddressSpace, OptimizationLevel,
};

use crate::{
    ast::{
        ast::{Program, Statement},
        types::Type,
    },
    errors::errors::LoweringError,
};

use super::stmt::{gen_function, gen_statement};

/// Name of the function that evaluates top-level statements.
pub const GLOBAL_INIT_FUNCTION: &str = "__lotus_global_init";

/// Priority used for the `llvm.global_ctors` entry.
const GLOBAL_INIT_PRIORITY: u64 = 65535;

/// A named storage location and the type of the value it holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Storage<'a> {
    pub pointer: PointerValue<'a>,
    pub value_type: BasicTypeEnum<'a>,
}

/// Lowering state of the function whose body is being generated.
///
/// A scope lives exactly as long as the lowering of one function body.
pub struct FunctionScope<'a> {
    pub name: String,
    pub function: FunctionValue<'a>,
    pub return_type: Type,
    /// Arguments and variables declared in the body
    pub locals: HashMap<String, Storage<'a>>,
}

impl<'a> FunctionScope<'a> {
    pub fn new(name: &str, function: FunctionValue<'a>, return_type: Type) -> Self {
        FunctionScope {
            name: name.to_string(),
            function,
            return_type,
            locals: HashMap::new(),
        }
    }
}

/// Serialized forms of a lowered module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Textual LLVM IR
    TextualIr,
    /// LLVM bitcode
    Bitcode,
}

impl OutputFormat {
    /// The fixed file name the module is written to.
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::TextualIr => "output.ll",
            OutputFormat::Bitcode => "output.bc",
        }
    }
}

/// The main compiler structure that holds the state of the lowering pass.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context
pub struct Compiler<'a> {
    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder
    pub builder: Builder<'a>,
    /// Map of struct names to their LLVM struct types
    pub named_structs: HashMap<String, StructType<'a>>,
    /// Storage of top-level variables
    pub globals: HashMap<String, Storage<'a>>,
    /// Created on the first top-level statement that needs code
    global_init: Option<FunctionValue<'a>>,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler targeting the host machine.
    ///
    /// # Arguments
    ///
    /// * `context` - Reference to the LLVM context
    /// * `module_name` - Name of the LLVM module, usually the source file name
    pub fn new(context: &'a Context, module_name: &str) -> Result<Self, LoweringError> {
        Target::initialize_native(&InitializationConfig::default())
            .map_err(LoweringError::Target)?;

        let target_triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&target_triple)
            .map_err(|error| LoweringError::Target(error.to_string()))?;
        let target_machine = target
            .create_target_machine(
                &target_triple,
                "generic",
                "",
                OptimizationLevel::Default,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| {
                LoweringError::Target(format!(
                    "no target machine for {}",
                    target_triple.as_str().to_string_lossy()
                ))
            })?;

        let module = context.create_module(module_name);
        module.set_triple(&target_triple);
        module.set_data_layout(&target_machine.get_target_data().get_data_layout());

        let mut compiler = Compiler {
            context,
            module,
            builder: context.create_builder(),
            named_structs: HashMap::new(),
            globals: HashMap::new(),
            global_init: None,
        };

        compiler.create_string_type();

        Ok(compiler)
    }

    /// Declares `String { i32 len, i8* data }`.
    fn create_string_type(&mut self) {
        let string_type = self.context.opaque_struct_type("String");
        string_type.set_body(
            &[
                self.context.i32_type().into(),
                self.context
                    .i8_type()
                    .ptr_type(AddressSpace::default())
                    .into(),
            ],
            false,
        );

        self.named_structs.insert(String::from("String"), string_type);
    }

    pub fn string_type(&self) -> StructType<'a> {
        match self.named_structs.get("String") {
            Some(string_type) => *string_type,
            None => unreachable!("the String struct is declared when the compiler is created"),
        }
    }

    /// Converts a language type to an LLVM basic type.
    ///
    /// `Void` has no value representation and maps to `None`.
    pub fn convert_type(&self, type_: Type) -> Option<BasicTypeEnum<'a>> {
        match type_ {
            Type::Int32 => Some(self.context.i32_type().into()),
            Type::Float32 => Some(self.context.f32_type().into()),
            Type::String => Some(self.string_type().into()),
            Type::Void => None,
        }
    }

    /// Builds the LLVM signature of a function.
    pub fn convert_fn_type(&self, return_type: Type, arg_types: &[Type]) -> FunctionType<'a> {
        // Void arguments are reserved a single byte, like void variables
        let params = arg_types
            .iter()
            .map(|arg_type| {
                self.convert_type(*arg_type)
                    .unwrap_or_else(|| self.context.i8_type().into())
                    .into()
            })
            .collect::<Vec<BasicMetadataTypeEnum>>();

        match self.convert_type(return_type) {
            Some(return_type) => return_type.fn_type(&params, false),
            None => self.context.void_type().fn_type(&params, false),
        }
    }

    /// Declares every top-level function so calls may precede definitions.
    fn declare_functions(&self, program: &Program) {
        for statement in &program.statements {
            if let Statement::Fn(function) = statement {
                if self.module.get_function(&function.name).is_none() {
                    let fn_type = self.convert_fn_type(function.return_type, &function.arg_types());
                    self.module.add_function(&function.name, fn_type, None);

                    log::trace!("declared function `{}`", function.name);
                }
            }
        }
    }

    /// Positions the builder at the end of the global initializer, creating
    /// the function on first use.
    pub fn position_at_global_init(&mut self) {
        let function = match self.global_init {
            Some(function) => function,
            None => {
                let fn_type = self.context.void_type().fn_type(&[], false);
                let function = self.module.add_function(GLOBAL_INIT_FUNCTION, fn_type, None);
                self.create_basic_block("entry", function);

                log::debug!("created global initializer `{}`", GLOBAL_INIT_FUNCTION);

                self.global_init = Some(function);
                function
            }
        };

        if let Some(block) = function.get_last_basic_block() {
            self.builder.position_at_end(block);
        }
    }

    /// Closes the initializer and registers it in `llvm.global_ctors`.
    fn finish_global_init(&mut self) -> Result<(), LoweringError> {
        let Some(function) = self.global_init else {
            return Ok(());
        };

        self.position_at_global_init();
        self.builder.build_return(None)?;

        let i8_ptr_type = self.context.i8_type().ptr_type(AddressSpace::default());
        let ctor = self.context.const_struct(
            &[
                self.context
                    .i32_type()
                    .const_int(GLOBAL_INIT_PRIORITY, false)
                    .into(),
                function.as_global_value().as_pointer_value().into(),
                i8_ptr_type.const_null().into(),
            ],
            false,
        );

        let ctors = ctor.get_type().const_array(&[ctor]);
        let global = self
            .module
            .add_global(ctors.get_type(), None, "llvm.global_ctors");
        global.set_linkage(Linkage::Appending);
        global.set_initializer(&ctors);

        Ok(())
    }

    /// Creates a zero-initialized global for a top-level variable.
    pub fn create_global(&mut self, name: &str, value_type: BasicTypeEnum<'a>) -> Storage<'a> {
        let global = self
            .module
            .add_global(value_type, Some(AddressSpace::default()), name);
        global.set_initializer(&zero_value(value_type));

        let storage = Storage {
            pointer: global.as_pointer_value(),
            value_type,
        };
        self.globals.insert(name.to_string(), storage);

        storage
    }

    /// Finds the storage of `name`: the function's locals first, then the
    /// globals.
    pub fn resolve_storage(
        &self,
        name: &str,
        scope: Option<&FunctionScope<'a>>,
    ) -> Result<Storage<'a>, LoweringError> {
        if let Some(storage) = scope.and_then(|scope| scope.locals.get(name)) {
            return Ok(*storage);
        }

        self.globals
            .get(name)
            .copied()
            .ok_or_else(|| LoweringError::UnresolvedStorage {
                name: name.to_string(),
                scope: scope
                    .map(|scope| format!("function {:?}", scope.name))
                    .unwrap_or_else(|| String::from("the global scope")),
            })
    }

    /// Creates a new basic block in the given function and positions the
    /// builder at its end.
    pub fn create_basic_block(&self, name: &str, function: FunctionValue<'a>) -> BasicBlock<'a> {
        let block = self.context.append_basic_block(function, name);
        self.builder.position_at_end(block);

        block
    }

    /// Whether the block the builder is in already ends with a terminator.
    pub fn block_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    /// Checks the module with the LLVM verifier.
    pub fn verify(&self) -> Result<(), LoweringError> {
        self.module
            .verify()
            .map_err(|error| LoweringError::InvalidModule(error.to_string()))
    }

    /// Saves the module as textual IR.
    pub fn save_module_to_file(&self, output_file: &Path) -> Result<(), LoweringError> {
        self.module
            .print_to_file(output_file)
            .map_err(|error| LoweringError::Output {
                path: output_file.display().to_string(),
                message: error.to_string(),
            })
    }

    /// Saves the module as bitcode.
    pub fn save_bitcode_to_file(&self, output_file: &Path) -> Result<(), LoweringError> {
        if self.module.write_bitcode_to_path(output_file) {
            return Ok(());
        }

        Err(LoweringError::Output {
            path: output_file.display().to_string(),
            message: String::from("LLVM could not write the bitcode"),
        })
    }

    pub fn emit(&self, format: OutputFormat, output_file: &Path) -> Result<(), LoweringError> {
        match format {
            OutputFormat::TextualIr => self.save_module_to_file(output_file),
            OutputFormat::Bitcode => self.save_bitcode_to_file(output_file),
        }
    }

    /// The textual IR of the module.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }
}

/// Renders an LLVM type for diagnostics.
pub fn describe_type(type_: BasicTypeEnum) -> String {
    type_.print_to_string().to_string()
}

/// The all-zero constant of a type.
pub fn zero_value(type_: BasicTypeEnum) -> BasicValueEnum {
    match type_ {
        BasicTypeEnum::ArrayType(array) => array.const_zero().into(),
        BasicTypeEnum::FloatType(float) => float.const_zero().into(),
        BasicTypeEnum::IntType(int) => int.const_zero().into(),
        BasicTypeEnum::PointerType(pointer) => pointer.const_zero().into(),
        BasicTypeEnum::StructType(structure) => structure.const_zero().into(),
        BasicTypeEnum::VectorType(vector) => vector.const_zero().into(),
    }
}

/// Lowers a parsed program into an LLVM module.
///
/// This is the primary entry point for lowering. It:
/// 1. Creates a new Compiler instance for the host target
/// 2. Declares every top-level function
/// 3. Lowers the statements in order; top-level variables and calls go into
///    the global initializer
/// 4. Registers the initializer as a static constructor
/// 5. Verifies the module
///
/// # Arguments
///
/// * `program` - The parsed program
/// * `module_name` - Name of the LLVM module
/// * `context` - Reference to the LLVM context
pub fn compile<'a>(
    program: &Program,
    module_name: &str,
    context: &'a Context,
) -> Result<Compiler<'a>, LoweringError> {
    let mut compiler = Compiler::new(context, module_name)?;

    compiler.declare_functions(program);

    for statement in &program.statements {
        match statement {
            Statement::Fn(function) => gen_function(&mut compiler, function, None)?,
            _ => gen_statement(&mut compiler, statement, None)?,
        }
    }

    compiler.finish_global_init()?;
    compiler.verify()?;

    log::debug!(
        "lowered {} top-level statements into module `{}`",
        program.statements.len(),
        module_name
    );

    Ok(compiler)
}
