use crate::{
    instructions::properties::{self, PROPERTIES},
    Revision,
};
use once_cell::race::OnceBox;

/// Per-opcode metrics the analyzer folds into basic block summaries.
#[derive(Clone, Copy, Debug)]
pub struct InstructionTableEntry {
    pub gas_cost: u16,
    pub stack_height_required: u8,
    pub stack_height_change: i8,
}

pub type InstructionTable = [Option<InstructionTableEntry>; 256];
pub type InstructionTables = [InstructionTable; Revision::len()];

pub static INSTRUCTION_TABLES: OnceBox<InstructionTables> = OnceBox::new();

/// Metrics of all instructions defined in the given revision; `None` marks
/// an opcode the revision does not know.
pub fn get_instruction_table(revision: Revision) -> &'static InstructionTable {
    &INSTRUCTION_TABLES.get_or_init(|| {
        let mut table = Box::new([[None; 256]; Revision::len()]);

        for revision in Revision::iter() {
            for (opcode, &cost) in properties::gas_costs(revision).iter().enumerate() {
                if let Some(cost) = cost {
                    let properties = PROPERTIES[opcode].unwrap();

                    // No instruction grows the stack by more than one item.
                    assert!(properties.stack_height_change <= 1);

                    table[revision as usize][opcode] = Some(InstructionTableEntry {
                        gas_cost: cost,
                        stack_height_required: properties.stack_height_required,
                        stack_height_change: properties.stack_height_change,
                    });
                }
            }
        }
        table
    })[revision as usize]
}
